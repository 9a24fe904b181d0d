#[cfg(test)]
mod tests {
    use crate::logic::{generate_slots, intervals_overlap, mark_unavailable, BusinessHours};
    use bookify_common::services::BusyInterval;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    // Overlap written out as the four separate situations a busy interval can
    // be in relative to a slot.
    fn overlap_by_cases(
        slot_start: DateTime<Utc>,
        slot_end: DateTime<Utc>,
        busy_start: DateTime<Utc>,
        busy_end: DateTime<Utc>,
    ) -> bool {
        let starts_inside = busy_start >= slot_start && busy_start < slot_end;
        let ends_inside = busy_end > slot_start && busy_end <= slot_end;
        let contains_slot = busy_start <= slot_start && busy_end >= slot_end;
        let inside_slot = busy_start >= slot_start && busy_end <= slot_end;
        starts_inside || ends_inside || contains_slot || inside_slot
    }

    fn at_minute(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn zones() -> impl Strategy<Value = Tz> {
        prop_oneof![
            Just(Tz::America__New_York),
            Just(Tz::Europe__Zurich),
            Just(Tz::UTC),
            Just(Tz::Asia__Kolkata),
        ]
    }

    proptest! {
        // The single inequality agrees with the four-case form on every
        // non-empty pair of intervals, abutting ones included.
        #[test]
        fn test_single_inequality_matches_case_analysis(
            slot_start in 0..600i64,
            slot_len in 1..120i64,
            busy_start in 0..600i64,
            busy_len in 1..240i64,
        ) {
            let (s1, e1) = (at_minute(slot_start), at_minute(slot_start + slot_len));
            let (s2, e2) = (at_minute(busy_start), at_minute(busy_start + busy_len));

            prop_assert_eq!(intervals_overlap(s1, e1, s2, e2), overlap_by_cases(s1, e1, s2, e2));
            prop_assert_eq!(intervals_overlap(s1, e1, s2, e2), intervals_overlap(s2, e2, s1, e1));
        }

        // Slots are contiguous, fixed length and never run past closing time.
        #[test]
        fn test_slots_tile_the_window(
            day_offset in 0..730i64,
            start_hour in 0..23u32,
            span in 1..12u32,
            duration in 5..180u32,
            tz in zones(),
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day_offset);
            let hours = BusinessHours {
                start_hour,
                end_hour: (start_hour + span).min(24),
                slot_duration_minutes: duration,
            };
            let slots = generate_slots(date, &hours, tz).unwrap();
            let step = Duration::minutes(i64::from(duration));

            for slot in &slots {
                prop_assert_eq!(slot.end - slot.start, step);
                prop_assert!(slot.available);
            }
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            if let (Some(first), Some(last)) = (slots.first(), slots.last()) {
                let (open, close) = crate::logic::business_window(date, &hours, tz).unwrap();
                prop_assert_eq!(first.start, open);
                prop_assert!(last.end <= close);
                // no room left for another slot
                prop_assert!(last.end + step > close);
            }
        }

        // A slot is unavailable exactly when some busy interval overlaps it.
        #[test]
        fn test_filter_matches_overlap(
            busy in proptest::collection::vec((0..1440i64, 1..240i64), 0..6),
        ) {
            let tz = Tz::UTC;
            let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
            let mut slots = generate_slots(date, &BusinessHours::default(), tz).unwrap();
            let busy: Vec<BusyInterval> = busy
                .into_iter()
                .map(|(start, len)| BusyInterval::new(at_minute(start), at_minute(start + len)))
                .collect();

            mark_unavailable(&mut slots, &busy);

            for slot in &slots {
                let (s, e) = (slot.start.with_timezone(&Utc), slot.end.with_timezone(&Utc));
                let expected = busy.iter().any(|b| overlap_by_cases(s, e, b.start, b.end));
                prop_assert_eq!(slot.available, !expected);
            }
        }
    }
}
