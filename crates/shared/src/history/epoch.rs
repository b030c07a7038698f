use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Chromium stores visit times as microseconds since 1601-01-01 UTC.
const WINDOWS_TO_UNIX_EPOCH_SECONDS: i64 = 11_644_473_600;

/// Safari stores visit times as seconds since 2001-01-01 UTC.
const MAC_ABSOLUTE_TO_UNIX_EPOCH_SECONDS: i64 = 978_307_200;

pub fn chromium_to_utc(raw_microseconds: i64) -> Option<DateTime<Utc>> {
    let unix_microseconds =
        raw_microseconds.checked_sub(WINDOWS_TO_UNIX_EPOCH_SECONDS.checked_mul(1_000_000)?)?;
    DateTime::from_timestamp_micros(unix_microseconds)
}

pub fn chromium_from_date(date: NaiveDate) -> i64 {
    let unix_seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    (unix_seconds + WINDOWS_TO_UNIX_EPOCH_SECONDS) * 1_000_000
}

pub fn safari_to_utc(raw_seconds: f64) -> Option<DateTime<Utc>> {
    let unix_seconds = raw_seconds + MAC_ABSOLUTE_TO_UNIX_EPOCH_SECONDS as f64;
    DateTime::from_timestamp_micros((unix_seconds * 1_000_000.0) as i64)
}

pub fn safari_from_date(date: NaiveDate) -> f64 {
    let unix_seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    (unix_seconds - MAC_ABSOLUTE_TO_UNIX_EPOCH_SECONDS) as f64
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{chromium_from_date, chromium_to_utc, safari_from_date, safari_to_utc};

    #[test]
    fn chromium_microseconds_round_trip() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let raw = chromium_from_date(date);
        assert_eq!(raw, 13_253_932_800_000_000);
        assert_eq!(
            chromium_to_utc(raw),
            Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn chromium_zero_is_the_vendor_epoch() {
        let converted = chromium_to_utc(0).unwrap();
        assert_eq!(
            converted,
            Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn safari_seconds_round_trip() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let raw = safari_from_date(date);
        assert_eq!(
            safari_to_utc(raw),
            Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
        );
    }
}
