use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// accepts RFC 3339 (e.g. 1970-01-01T00:00:00Z) as well as the naive DATE_FMT form
pub fn parse_date(str_time: &str) -> Option<NaiveDateTime> {
    if let Ok(time) = DateTime::parse_from_rfc3339(str_time) {
        return Some(time.naive_utc());
    }
    NaiveDateTime::parse_from_str(str_time, DATE_FMT).ok()
}

pub fn time_to_json(t: NaiveDateTime) -> String {
    Utc.from_utc_datetime(&t).to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{parse_date, time_to_json};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time_to_json(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        parse_date(&str_time).ok_or_else(|| D::Error::custom(format!("invalid date {}", str_time)))
    }
}

pub mod opt_serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{parse_date, time_to_json};

    pub fn serialize<S: Serializer>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        time.map(time_to_json).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let str_time: Option<String> = Deserialize::deserialize(deserializer)?;
        match str_time {
            Some(str_time) if !str_time.is_empty() => {
                parse_date(&str_time).map(Some).ok_or_else(|| D::Error::custom(format!("invalid date {}", str_time)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use crate::utils::date::{parse_date, time_to_json};

    #[tokio::test]
    async fn test_should_format_epoch_as_rfc3339() {
        let epoch = NaiveDateTime::from_timestamp_opt(0, 0).expect("epoch");
        assert_eq!("1970-01-01T00:00:00Z", time_to_json(epoch).as_str());
    }

    #[tokio::test]
    async fn test_should_parse_both_formats() {
        let from_rfc = parse_date("2022-09-24T04:40:35.726Z").expect("rfc3339");
        let from_naive = parse_date("2022-09-24T04:40:35.726").expect("naive");
        assert_eq!(from_rfc, from_naive);
        assert!(parse_date("yesterday").is_none());
    }
}
