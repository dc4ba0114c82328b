use crate::utils::error::Result;
use crate::utils::validation::{
    validate_date_not_past, validate_non_empty_string, validate_positive_id, validate_url,
    Validate,
};
use chrono::{Local, NaiveDate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "cafe-booking")]
#[command(about = "Resolve table/slot availability for a cafe and optionally book")]
pub struct CliConfig {
    #[arg(long, default_value = "http://localhost:8000/api")]
    pub base_url: String,

    #[arg(long, help = "Cafe to book in")]
    pub cafe_id: i64,

    #[arg(long, help = "Booking date (YYYY-MM-DD), defaults to today")]
    pub date: Option<NaiveDate>,

    #[arg(long, help = "Preferred table id")]
    pub table_id: Option<i64>,

    #[arg(long, help = "Preferred slot id")]
    pub slot_id: Option<i64>,

    #[arg(long, help = "Free-form note attached to the booking")]
    pub note: Option<String>,

    #[arg(long, help = "Bearer token for the backend")]
    pub token: Option<String>,

    #[arg(long, help = "Create the booking after resolving availability")]
    pub submit: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_positive_id("cafe_id", self.cafe_id)?;
        if let Some(table_id) = self.table_id {
            validate_positive_id("table_id", table_id)?;
        }
        if let Some(slot_id) = self.slot_id {
            validate_positive_id("slot_id", slot_id)?;
        }
        if let Some(date) = self.date {
            validate_date_not_past("date", date, Local::now().date_naive())?;
        }
        if let Some(note) = &self.note {
            validate_non_empty_string("note", note)?;
        }
        if let Some(token) = &self.token {
            validate_non_empty_string("token", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config() -> CliConfig {
        CliConfig {
            base_url: "http://localhost:8000/api".to_string(),
            cafe_id: 1,
            date: None,
            table_id: None,
            slot_id: None,
            note: None,
            token: None,
            submit: false,
            verbose: false,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_past_date_fails_config_validation() {
        let mut cfg = config();
        cfg.date = Some(Local::now().date_naive() - Duration::days(1));
        assert!(cfg.validate().is_err());

        cfg.date = Some(Local::now().date_naive());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_blank_note_is_rejected() {
        let mut cfg = config();
        cfg.note = Some("   ".to_string());
        assert!(cfg.validate().is_err());

        cfg.note = Some("window seat".to_string());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let mut cfg = config();
        cfg.token = Some(String::new());
        assert!(cfg.validate().is_err());

        cfg.token = Some("secret-token".to_string());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_non_positive_ids_are_rejected() {
        let mut cfg = config();
        cfg.cafe_id = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.table_id = Some(-1);
        assert!(cfg.validate().is_err());
    }
}
