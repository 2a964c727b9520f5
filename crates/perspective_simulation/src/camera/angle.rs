//! Soft angle limiting (smoothstep clamp)

/// Saturation domain = `SATURATION_FACTOR × limit`
pub const SATURATION_FACTOR: f32 = 3.0;

/// Cubic smoothstep `3t² − 2t³` с clamp `t` в [0, 1]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Soft clamp угла (градусы) к `±limit`
///
/// `|angle|` проходит через smoothstep на [0, 3·limit] → factor в [0, 1],
/// результат `factor · limit · sign(angle)`. Начиная с `3·limit` выход = `±limit`.
///
/// Невалидный limit (≤ 0, NaN, inf) или NaN angle → 0 (камера остаётся в rest pose).
pub fn limit_angle(angle: f32, limit: f32) -> f32 {
    if !(limit.is_finite() && limit > 0.0) || angle.is_nan() || angle == 0.0 {
        return 0.0;
    }

    let factor = smoothstep(0.0, SATURATION_FACTOR * limit, angle.abs());
    factor * limit * angle.signum()
}
