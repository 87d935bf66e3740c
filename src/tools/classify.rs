//! Classify tool implementation

use crate::cli::ClassifyArgs;
use crate::identity::{classify, IdentityClassification};

pub fn execute_classify(args: &ClassifyArgs) -> IdentityClassification {
    classify(args.value.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_classify() {
        let result = execute_classify(&ClassifyArgs {
            value: Some("abcde1234f".to_string()),
        });
        assert_eq!(result.to_text(), "PAN_CARD_VERIFIED: ABCDE1234F (tax-id)");

        let result = execute_classify(&ClassifyArgs { value: None });
        assert_eq!(result.to_text(), "ID_UNSPECIFIED: N/A (unspecified)");
    }
}
