use clap::Parser;
use uuid::Uuid;

use crate::configuration::Configuration;
use crate::engine::EngineConfig;
use crate::error::ConfigError;
use crate::types::parse_hhmm;

/// Command-line configuration for the service. Engine defaults match the
/// documented ones: a 30-minute grid over 09:00-11:30 and 14:00-17:30,
/// offered for the next 7 working days within a 60-calendar-day scan cap.
#[derive(Debug, Clone, Parser)]
pub struct ConfigurationHandler {
    #[arg(long, default_value = "3000")]
    port: String,

    /// Business-hour ranges as inclusive HH:MM-HH:MM pairs, comma separated.
    #[arg(long, default_value = "09:00-11:30,14:00-17:30")]
    business_hours: String,

    /// Slot granularity in minutes.
    #[arg(long, default_value_t = 30)]
    slot_minutes: u32,

    /// Number of working days offered in the availability window.
    #[arg(long, default_value_t = 7)]
    window_days: usize,

    /// Maximum calendar days scanned while collecting working days.
    #[arg(long, default_value_t = 60)]
    max_lookahead_days: u32,

    /// Seed a few example bookings for this doctor at startup.
    #[arg(long)]
    demo_doctor: Option<Uuid>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.clone()
    }

    fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let mut business_hours = Vec::new();
        for range in self.business_hours.split(',') {
            let malformed = || ConfigError::MalformedBusinessHours(range.to_string());
            let (start, end) = range.trim().split_once('-').ok_or_else(malformed)?;
            let start = parse_hhmm(start).map_err(|_| malformed())?;
            let end = parse_hhmm(end).map_err(|_| malformed())?;
            business_hours.push((start, end));
        }
        Ok(EngineConfig {
            business_hours,
            slot_minutes: self.slot_minutes,
            window_days: self.window_days,
            max_lookahead_days: self.max_lookahead_days,
        })
    }

    fn demo_doctor_id(&self) -> Option<Uuid> {
        self.demo_doctor
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveTime;

    fn handler_with_hours(business_hours: &str) -> ConfigurationHandler {
        ConfigurationHandler::parse_from(["test", "--business-hours", business_hours])
    }

    #[test]
    fn default_arguments_yield_the_documented_engine_config() {
        let handler = ConfigurationHandler::parse_from(["test"]);
        let config = handler.engine_config().unwrap();

        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(
            config.business_hours,
            vec![(hm(9, 0), hm(11, 30)), (hm(14, 0), hm(17, 30))]
        );
        assert_eq!(config.slot_minutes, 30);
        assert_eq!(config.window_days, 7);
        assert_eq!(config.max_lookahead_days, 60);
        assert_eq!(handler.port(), "3000");
        assert_eq!(handler.demo_doctor_id(), None);
    }

    #[test_case::test_case("09:00")]
    #[test_case::test_case("09:00-25:00")]
    #[test_case::test_case("9-11")]
    #[test_case::test_case("")]
    fn malformed_business_hours_are_rejected(raw: &str) {
        let handler = handler_with_hours(raw);
        assert!(matches!(
            handler.engine_config().unwrap_err(),
            ConfigError::MalformedBusinessHours(_)
        ));
    }

    #[test]
    fn custom_single_range_parses() {
        let handler = handler_with_hours("08:00-12:00");
        let config = handler.engine_config().unwrap();
        assert_eq!(config.business_hours.len(), 1);
    }
}
