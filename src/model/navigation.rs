use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::controller::NavCommand;

/// A point in space looking in a direction given by two angles.
///
/// Longitude 0 looks along -Z and grows when turning right (toward +X).
/// Latitude 0 is level and is kept within `[-PI/2, PI/2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPoint {
    pub position: Vec3,
    longitude: f32,
    latitude: f32,
}

impl Default for NavigationPoint {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationPoint {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            longitude: 0.0,
            latitude: 0.0,
        }
    }

    pub fn longitude(&self) -> f32 {
        self.longitude
    }

    pub fn latitude(&self) -> f32 {
        self.latitude
    }

    /// Unit vector the point is looking along. Recomputed on every call.
    pub fn direction(&self) -> Vec3 {
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        Vec3::new(sin_lon * cos_lat, sin_lat, -cos_lon * cos_lat)
    }

    /// Horizontal unit vector pointing to the right of `direction()`.
    pub fn right_vector(&self) -> Vec3 {
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        Vec3::new(cos_lon, 0.0, sin_lon)
    }

    /// Camera-up vector, orthogonal to `direction()`. Well defined at the poles
    /// where world up and `direction()` coincide.
    pub fn up_vector(&self) -> Vec3 {
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        Vec3::new(-sin_lat * sin_lon, cos_lat, sin_lat * cos_lon)
    }

    pub fn forward(&mut self, distance: f32) {
        self.position += distance * self.direction();
    }

    pub fn backward(&mut self, distance: f32) {
        self.position -= distance * self.direction();
    }

    pub fn left(&mut self, distance: f32) {
        self.position -= distance * self.right_vector();
    }

    pub fn right(&mut self, distance: f32) {
        self.position += distance * self.right_vector();
    }

    pub fn up(&mut self, distance: f32) {
        self.position.y += distance;
    }

    pub fn down(&mut self, distance: f32) {
        self.position.y -= distance;
    }

    pub fn turn_left(&mut self, angle: f32) {
        self.longitude -= angle;
    }

    pub fn turn_right(&mut self, angle: f32) {
        self.longitude += angle;
    }

    /// Returns `false` when the tilt had to be clamped.
    pub fn tilt_up(&mut self, angle: f32) -> bool {
        self.tilt_to(self.latitude + angle)
    }

    /// Returns `false` when the tilt had to be clamped.
    pub fn tilt_down(&mut self, angle: f32) -> bool {
        self.tilt_to(self.latitude - angle)
    }

    fn tilt_to(&mut self, requested: f32) -> bool {
        let clamped = requested.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.latitude = clamped;
        clamped == requested
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Run one input command. Returns `false` only for a clamped tilt.
    pub fn apply(&mut self, command: NavCommand) -> bool {
        match command {
            NavCommand::Forward(d) => self.forward(d),
            NavCommand::Backward(d) => self.backward(d),
            NavCommand::Left(d) => self.left(d),
            NavCommand::Right(d) => self.right(d),
            NavCommand::Up(d) => self.up(d),
            NavCommand::Down(d) => self.down(d),
            NavCommand::TurnLeft(a) => self.turn_left(a),
            NavCommand::TurnRight(a) => self.turn_right(a),
            NavCommand::TiltUp(a) => return self.tilt_up(a),
            NavCommand::TiltDown(a) => return self.tilt_down(a),
            NavCommand::Reset => self.reset(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-5;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPS, "expected {b:?}, got {a:?}");
    }

    #[test]
    fn test_direction_is_unit_length() {
        let mut point = NavigationPoint::new();
        for i in 0..=16 {
            let lat = -FRAC_PI_2 + i as f32 * PI / 16.0;
            for j in 0..32 {
                point.longitude = j as f32 * PI / 8.0 - 2.0 * PI;
                point.latitude = lat;
                let len = point.direction().length();
                assert!((len - 1.0).abs() < EPS, "|direction| = {len} at lon {}, lat {lat}", point.longitude);
            }
        }
    }

    #[test]
    fn test_default_direction_is_negative_z() {
        assert_vec_close(NavigationPoint::new().direction(), Vec3::NEG_Z);
    }

    #[test]
    fn test_forward_from_origin_lands_on_direction() {
        let mut point = NavigationPoint::new();
        let direction = point.direction();
        point.forward(1.0);
        assert_vec_close(point.position, direction);
    }

    #[test]
    fn test_forward_then_backward_restores_position() {
        let mut point = NavigationPoint::new();
        point.position = Vec3::new(3.0, -1.0, 2.5);
        point.turn_right(0.7);
        point.tilt_up(0.4);
        let start = point.position;

        point.forward(2.3);
        point.backward(2.3);
        assert_vec_close(point.position, start);
    }

    #[test]
    fn test_turn_left_then_right_restores_longitude() {
        let mut point = NavigationPoint::new();
        point.turn_right(1.1);
        let start = point.longitude();

        point.turn_left(PI / 24.0);
        point.turn_right(PI / 24.0);
        assert!((point.longitude() - start).abs() < EPS);
    }

    #[test]
    fn test_quarter_turn_then_forward_is_orthogonal() {
        let mut point = NavigationPoint::new();
        let before = point.direction();

        point.turn_right(FRAC_PI_2);
        point.forward(1.0);
        assert!(point.position.dot(before).abs() < EPS);
        assert_vec_close(point.position, Vec3::X);
    }

    #[test]
    fn test_strafe_ignores_latitude() {
        let mut level = NavigationPoint::new();
        let mut tilted = NavigationPoint::new();
        tilted.tilt_up(1.0);

        level.right(1.0);
        tilted.right(1.0);
        assert_vec_close(level.position, tilted.position);
        assert_vec_close(level.position, Vec3::X);

        level.left(2.0);
        assert_vec_close(level.position, Vec3::NEG_X);
    }

    #[test]
    fn test_movement_keeps_angles_and_turning_keeps_position() {
        let mut point = NavigationPoint::new();
        point.turn_left(0.3);
        point.tilt_down(0.2);
        let (lon, lat) = (point.longitude(), point.latitude());

        point.forward(1.0);
        point.left(0.5);
        point.up(0.25);
        point.down(0.1);
        assert_eq!((point.longitude(), point.latitude()), (lon, lat));

        let pos = point.position;
        point.turn_right(0.9);
        point.tilt_up(0.5);
        assert_eq!(point.position, pos);
    }

    #[test]
    fn test_up_down_only_change_height() {
        let mut point = NavigationPoint::new();
        point.up(0.5);
        assert_eq!(point.position, Vec3::new(0.0, 0.5, 0.0));
        point.down(1.5);
        assert_eq!(point.position, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_tilt_beyond_clamp_in_one_call() {
        let mut point = NavigationPoint::new();
        assert!(!point.tilt_up(PI));
        assert_eq!(point.latitude(), FRAC_PI_2);
    }

    #[test]
    fn test_saturated_tilt_is_idempotent() {
        let mut point = NavigationPoint::new();
        while point.tilt_up(PI / 48.0) {}
        assert_eq!(point.latitude(), FRAC_PI_2);

        for _ in 0..5 {
            assert!(!point.tilt_up(PI / 48.0));
            assert_eq!(point.latitude(), FRAC_PI_2);
        }

        assert!(!point.tilt_down(10.0));
        assert_eq!(point.latitude(), -FRAC_PI_2);
        assert!(!point.tilt_down(0.1));
        assert_eq!(point.latitude(), -FRAC_PI_2);
    }

    #[test]
    fn test_tilt_within_range_is_applied() {
        let mut point = NavigationPoint::new();
        assert!(point.tilt_up(0.25));
        assert!(point.tilt_down(0.5));
        assert!((point.latitude() + 0.25).abs() < EPS);
    }

    #[test]
    fn test_direction_at_poles() {
        let mut point = NavigationPoint::new();
        point.turn_right(0.8);
        point.tilt_up(PI);
        let dir = point.direction();
        assert!((dir.length() - 1.0).abs() < EPS);
        assert_vec_close(dir, Vec3::Y);

        let up = point.up_vector();
        assert!((up.length() - 1.0).abs() < EPS);
        assert!(up.dot(dir).abs() < EPS);
    }

    #[test]
    fn test_up_vector_is_orthogonal_to_direction() {
        let mut point = NavigationPoint::new();
        point.turn_left(2.0);
        point.tilt_down(0.6);
        assert!(point.up_vector().dot(point.direction()).abs() < EPS);
        assert!(point.up_vector().y > 0.0);
    }

    #[test]
    fn test_reset_yields_fixed_state() {
        let fresh = NavigationPoint::new();

        let mut a = NavigationPoint::new();
        a.forward(3.0);
        a.turn_right(1.0);
        a.tilt_up(PI);
        a.reset();

        let mut b = NavigationPoint::new();
        b.down(7.0);
        b.turn_left(12.0);
        b.reset();

        assert_eq!(a, fresh);
        assert_eq!(b, fresh);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut point = NavigationPoint::new();
        assert!(point.apply(NavCommand::Forward(1.0)));
        assert_vec_close(point.position, Vec3::NEG_Z);
        assert!(point.apply(NavCommand::TurnRight(0.5)));
        assert_eq!(point.longitude(), 0.5);
        assert!(!point.apply(NavCommand::TiltDown(PI)));
        assert!(point.apply(NavCommand::Reset));
        assert_eq!(point, NavigationPoint::new());
    }
}
