//! Physical constants shared by the reaction thermodynamics and the diagram engine.

/// gas constant, J/mol/K
pub const R: f64 = 8.31446;
/// Faraday constant, C/mol
pub const F: f64 = 96485.3;
pub const LN_10: f64 = std::f64::consts::LN_10;
/// 0 °C in K
pub const T_ZERO_CELSIUS: f64 = 273.15;
/// standard temperature, K
pub const T_STANDARD: f64 = 298.15;
/// standard potential of O2 + 4H+ + 4e- -> 2H2O, V
pub const E0_O2_H2O: f64 = 1.23;
/// pKw of water at 25 °C
pub const PKW: f64 = 14.0;

/// Nernstian slope R*T*ln(10)/F in V per decade (0.0592 V at 298.15 K)
pub fn nernst_slope(t_k: f64) -> f64 {
    R * t_k * LN_10 / F
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nernst_slope_at_25c() {
        assert_relative_eq!(nernst_slope(T_STANDARD), 0.05916, epsilon = 1e-4);
    }
}
