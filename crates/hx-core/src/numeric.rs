/// Floating point type used throughout the pipeline
pub type Real = f64;

/// Parse a whitespace-free token as a number.
///
/// Accepts the usual decimal and exponent forms plus `nan`/`inf`, the way
/// solver output writes them. Anything else is `None`.
pub fn parse_real(token: &str) -> Option<Real> {
    token.parse::<Real>().ok()
}
