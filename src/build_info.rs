//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_date_format() {
        // Should be YYYY-MM-DD format
        assert_eq!(BUILD_DATE.len(), 10);
    }
}
