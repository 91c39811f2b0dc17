//! Tests for the position domain model.

#[cfg(test)]
mod tests {
    use crate::positions::Position;
    use crate::Error;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_new_position_has_no_id() {
        let position = Position::new("A1", "SEC-1", sample_date(), dec!(100.50));
        assert_eq!(position.id, None);
        assert_eq!(position.account_code, "A1");
        assert_eq!(position.security_id, "SEC-1");
        assert_eq!(position.market_value, dec!(100.50));
    }

    #[test]
    fn test_validate_accepts_complete_position() {
        let position = Position::new("A1", "SEC-1", sample_date(), dec!(1));
        assert!(position.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_account_code() {
        let position = Position::new("  ", "SEC-1", sample_date(), dec!(1));
        match position.validate() {
            Err(Error::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_validate_rejects_empty_security_id() {
        let position = Position::new("A1", "", sample_date(), dec!(1));
        assert!(position.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let position = Position {
            id: Some(42),
            account_code: "A1".to_string(),
            security_id: "SEC-1".to_string(),
            position_date: sample_date(),
            market_value: dec!(250.75),
        };
        let json = serde_json::to_string(&position).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, position);
    }
}
