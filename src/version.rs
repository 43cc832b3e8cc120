// Build identity shown in the dispatcher banner and the dashboard footer

pub const NAME: &str = env!("CARGO_PKG_NAME");

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `name vX.Y.Z`.
pub fn label() -> String {
    format!("{} v{}", NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_names_the_build() {
        assert_eq!(label(), format!("cauldron v{}", VERSION));
        assert!(!VERSION.is_empty());
    }
}
