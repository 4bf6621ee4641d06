use chrono::{DateTime, FixedOffset, NaiveDateTime, ParseResult, TimeZone, Utc};

/// 对外输出的统一时间文本格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// # Summary
/// 目标时区：印度标准时间 UTC+5:30，无夏令时。
///
/// # Invariants
/// - 编译期常量，偏移非法时常量求值直接失败，运行期不存在回退分支。
/// - 进程内全局只读共享，无需同步。
pub const TARGET_ZONE: FixedOffset = match FixedOffset::east_opt(5 * 3600 + 30 * 60) {
    Some(offset) => offset,
    None => unreachable!(),
};

/// # Summary
/// 将上游原生时间换算到目标时区。
///
/// # Logic
/// 1. 丢弃输入自带的时区偏移，仅保留墙上时间 (naive)。
/// 2. 将该墙上时间重新解释为 GMT。
/// 3. 从 GMT 换算到目标时区 (IST)。
///
/// 上游历史 K 线按 GMT 标注或不带时区，因此第 1 步有意忽略内嵌偏移。
///
/// # Arguments
/// * `t`: 任意时区的时间。
///
/// # Returns
/// 目标时区下的时间。纯函数，对任意合法输入都有定义。
pub fn to_target_zone<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<FixedOffset> {
    naive_to_target_zone(&t.naive_local())
}

/// # Summary
/// 将一个不带时区的墙上时间视为 GMT 后换算到目标时区。
pub fn naive_to_target_zone(naive: &NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(naive).with_timezone(&TARGET_ZONE)
}

/// 按 `YYYY-MM-DD HH:MM:SS` 输出墙上时间
pub fn format_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// 解析 `format_timestamp` 的输出 (不携带时区)
pub fn parse_timestamp(text: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_gmt_wall_clock_shifts_by_five_thirty() {
        let t = Utc.from_utc_datetime(&naive(2024, 3, 15, 3, 45, 0));
        let ist = to_target_zone(&t);
        assert_eq!(format_timestamp(&ist), "2024-03-15 09:15:00");
        assert_eq!(ist.offset().local_minus_utc(), 19800);
    }

    #[test]
    fn test_embedded_offset_is_discarded() {
        // 墙上时间 09:15 (+05:30) 被当作 09:15 GMT，再换算为 14:45 IST
        let ist_input = TARGET_ZONE
            .from_local_datetime(&naive(2024, 3, 15, 9, 15, 0))
            .single()
            .unwrap();
        let converted = to_target_zone(&ist_input);
        assert_eq!(format_timestamp(&converted), "2024-03-15 14:45:00");

        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();
        let ny_input = new_york
            .from_local_datetime(&naive(2024, 3, 15, 9, 15, 0))
            .single()
            .unwrap();
        assert_eq!(to_target_zone(&ny_input), converted);
    }

    #[test]
    fn test_target_zone_is_fixed_ist() {
        assert_eq!(TARGET_ZONE.local_minus_utc(), 19800);
        assert_eq!(TARGET_ZONE.to_string(), "+05:30");
    }

    #[test]
    fn test_crosses_midnight() {
        let converted = naive_to_target_zone(&naive(2023, 12, 31, 20, 0, 0));
        assert_eq!(format_timestamp(&converted), "2024-01-01 01:30:00");
    }

    #[test]
    fn test_reformatting_is_stable() {
        let samples = [
            naive(2024, 1, 1, 0, 0, 0),
            naive(2024, 2, 29, 23, 59, 59),
            naive(1999, 6, 30, 12, 0, 1),
        ];
        for s in samples {
            let first = format_timestamp(&naive_to_target_zone(&s));
            let reparsed = parse_timestamp(&first).unwrap();
            let second = format_timestamp(
                &TARGET_ZONE.from_local_datetime(&reparsed).single().unwrap(),
            );
            assert_eq!(first, second);
            // 确定性：重复调用结果一致
            assert_eq!(naive_to_target_zone(&s), naive_to_target_zone(&s));
        }
    }
}
