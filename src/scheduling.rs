//! Чистая интервальная арифметика расписания: часы работы кинотеатра,
//! расчет окончания сеанса, проверка пересечений и подбор свободных слотов.
//!
//! Время представлено минутами от полуночи даты сеанса; окончание позже
//! 1440 означает переход через полночь (ограничено правилом 01:00).

use chrono::NaiveTime;
use thiserror::Error;

/// Открытие кинотеатра, 10:00.
pub const OPENING_MIN: i32 = 10 * 60;
/// Последний допустимый старт - строго до 23:00.
pub const LAST_START_MIN: i32 = 23 * 60;
/// Сеанс обязан закончиться не позже 01:00 следующего дня.
pub const LATEST_END_MIN: i32 = 25 * 60;
/// Уборка зала между показами.
pub const CLEANUP_BUFFER_MIN: i32 = 30;

const MINUTES_PER_DAY: i32 = 24 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Кинотеатр работает с 10:00 до 23:00")]
    OutOfHours,
    #[error("Сеанс должен заканчиваться до 01:00")]
    ClosingHours,
    #[error("Сеанс пересекается с существующим сеансом #{session_id}")]
    Overlap { session_id: i64 },
}

/// Показ как полуоткрытый интервал [start, end) в минутах от полуночи.
/// `end == None` - у фильма неизвестна длительность: такой сеанс не
/// участвует в проверках пересечений (унаследованное мягкое поведение).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Showing {
    pub start: i32,
    pub end: Option<i32>,
}

impl Showing {
    /// Восстанавливает интервал из хранимых TIME-полей: окончание, равное
    /// старту или раньше него, лежит на следующих сутках.
    pub fn from_times(start: NaiveTime, end: Option<NaiveTime>) -> Self {
        let start_min = minutes_of(start);
        let end_min = end.map(|e| {
            let e = minutes_of(e);
            if e <= start_min {
                e + MINUTES_PER_DAY
            } else {
                e
            }
        });
        Showing {
            start: start_min,
            end: end_min,
        }
    }
}

pub fn minutes_of(t: NaiveTime) -> i32 {
    use chrono::Timelike;
    (t.hour() * 60 + t.minute()) as i32
}

pub fn time_of(minutes: i32) -> NaiveTime {
    let m = minutes.rem_euclid(MINUTES_PER_DAY) as u32;
    NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap()
}

/// Старт допустим в [10:00, 23:00).
pub fn validate_start(start_min: i32) -> Result<(), ScheduleError> {
    if start_min < OPENING_MIN || start_min >= LAST_START_MIN {
        return Err(ScheduleError::OutOfHours);
    }
    Ok(())
}

/// Расчетное окончание: старт + длительность + уборка. Для фильма без
/// известной длительности окончание не определено и проверка на 01:00
/// пропускается.
pub fn projected_end(
    start_min: i32,
    duration_min: Option<i32>,
) -> Result<Option<i32>, ScheduleError> {
    let Some(duration) = duration_min.filter(|d| *d > 0) else {
        return Ok(None);
    };
    let end = start_min + duration + CLEANUP_BUFFER_MIN;
    if end > LATEST_END_MIN {
        return Err(ScheduleError::ClosingHours);
    }
    Ok(Some(end))
}

/// Пересечение полуоткрытых интервалов; сеансы встык не конфликтуют.
/// Интервал без окончания не пересекается ни с чем.
pub fn overlaps(a: Showing, b: Showing) -> bool {
    match (a.end, b.end) {
        (Some(a_end), Some(b_end)) => a.start < b_end && a_end > b.start,
        _ => false,
    }
}

/// Первый конфликтующий сеанс зала на эту дату, если он есть.
pub fn find_conflict(candidate: Showing, existing: &[(i64, Showing)]) -> Option<i64> {
    existing
        .iter()
        .find(|(_, other)| overlaps(candidate, *other))
        .map(|(id, _)| *id)
}

/// Кандидат на новый сеанс: [start, end) без учета уборки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: i32,
    pub end: i32,
}

/// Жадный проход по сетке слотов с 10:00: кандидат свободен, если не
/// пересекается ни с одним существующим показом; следующий кандидат
/// начинается через 30 минут после окончания текущего независимо от
/// результата. Без состояния между вызовами.
pub fn available_slots(duration_min: Option<i32>, existing: &[Showing]) -> Vec<Slot> {
    let Some(duration) = duration_min.filter(|d| *d > 0) else {
        // Нулевой шаг не продвигает сетку - слотов не предлагаем
        return Vec::new();
    };

    let mut slots = Vec::new();
    let mut start = OPENING_MIN;
    loop {
        let end = start + duration;
        if end > LAST_START_MIN {
            break;
        }
        let candidate = Showing {
            start,
            end: Some(end),
        };
        if !existing.iter().any(|s| overlaps(candidate, *s)) {
            slots.push(Slot { start, end });
        }
        start = end + CLEANUP_BUFFER_MIN;
        if start >= LAST_START_MIN {
            break;
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn showing(start: i32, end: i32) -> Showing {
        Showing {
            start,
            end: Some(end),
        }
    }

    #[test]
    fn start_must_fall_inside_opening_hours() {
        assert_eq!(
            validate_start(minutes_of(t(9, 59))),
            Err(ScheduleError::OutOfHours)
        );
        assert_eq!(
            validate_start(minutes_of(t(23, 0))),
            Err(ScheduleError::OutOfHours)
        );
        assert_eq!(validate_start(minutes_of(t(10, 0))), Ok(()));
        assert_eq!(validate_start(minutes_of(t(22, 59))), Ok(()));
    }

    #[test]
    fn end_includes_cleanup_buffer() {
        // 10:00 + 90 мин + 30 мин уборки = 12:00
        assert_eq!(projected_end(600, Some(90)), Ok(Some(720)));
    }

    #[test]
    fn end_may_cross_midnight_until_one_am() {
        // 22:00 + 150 + 30 = ровно 01:00 - допустимо
        assert_eq!(projected_end(1320, Some(150)), Ok(Some(1500)));
        // 22:00 + 151 + 30 - уже нет
        assert_eq!(
            projected_end(1320, Some(151)),
            Err(ScheduleError::ClosingHours)
        );
    }

    #[test]
    fn unknown_duration_leaves_end_undefined() {
        assert_eq!(projected_end(600, None), Ok(None));
        assert_eq!(projected_end(600, Some(0)), Ok(None));
        // даже очень поздний старт не отклоняется по окончанию
        assert_eq!(projected_end(1379, None), Ok(None));
    }

    #[test]
    fn overlapping_intervals_conflict() {
        // A: 10:00-12:00 (90 мин + уборка), B стартует в 11:00
        let a = showing(600, 720);
        let b = showing(660, 780);
        assert!(overlaps(a, b));
        assert!(overlaps(b, a));
    }

    #[test]
    fn session_after_buffer_does_not_conflict() {
        let a = showing(600, 720);
        // B в 12:30 - после окончания A
        assert!(!overlaps(a, showing(750, 870)));
        // встык: окончание A == старт B
        assert!(!overlaps(a, showing(720, 840)));
    }

    #[test]
    fn undefined_end_bypasses_overlap_checks() {
        let open_ended = Showing {
            start: 600,
            end: None,
        };
        assert!(!overlaps(open_ended, showing(600, 720)));
        assert!(!overlaps(showing(600, 720), open_ended));
    }

    #[test]
    fn conflict_reports_the_colliding_session() {
        let existing = vec![(7, showing(600, 720)), (8, showing(780, 900))];
        assert_eq!(find_conflict(showing(660, 780), &existing), Some(7));
        assert_eq!(find_conflict(showing(720, 780), &existing), None);
    }

    #[test]
    fn midnight_crossing_end_restores_next_day_interval() {
        let s = Showing::from_times(t(22, 59), Some(t(0, 59)));
        assert_eq!(s.start, 1379);
        assert_eq!(s.end, Some(1499));
    }

    #[test]
    fn slots_scan_is_deterministic_and_finite() {
        // Пустой зал, фильм 90 мин: старты каждые 120 мин с 10:00
        let slots = available_slots(Some(90), &[]);
        let starts: Vec<i32> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![600, 720, 840, 960, 1080, 1200]);
        assert!(slots.iter().all(|s| s.end <= LAST_START_MIN));
        // повторный вызов дает тот же результат
        assert_eq!(available_slots(Some(90), &[]), slots);
    }

    #[test]
    fn occupied_interval_is_skipped_but_grid_advances() {
        // Сеанс занимает 10:00-12:00; первый кандидат (10:00-11:30)
        // пропускается, сетка все равно шагает от его окончания
        let slots = available_slots(Some(90), &[showing(600, 720)]);
        assert_eq!(slots.first().map(|s| s.start), Some(720));
        assert!(!slots.iter().any(|s| s.start == 600));
    }

    #[test]
    fn unknown_duration_yields_no_slots() {
        assert!(available_slots(None, &[showing(600, 720)]).is_empty());
        assert!(available_slots(Some(0), &[]).is_empty());
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a_start in 0..1440i32, a_len in 1..300i32,
                                b_start in 0..1440i32, b_len in 1..300i32) {
            let a = showing(a_start, a_start + a_len);
            let b = showing(b_start, b_start + b_len);
            prop_assert_eq!(overlaps(a, b), overlaps(b, a));
        }

        #[test]
        fn adjacent_intervals_never_overlap(start in 0..1440i32,
                                            first in 1..300i32,
                                            second in 1..300i32) {
            let a = showing(start, start + first);
            let b = showing(start + first, start + first + second);
            prop_assert!(!overlaps(a, b));
        }

        #[test]
        fn contained_interval_always_overlaps(start in 0..1440i32,
                                              len in 3..300i32) {
            let outer = showing(start, start + len);
            let inner = showing(start + 1, start + len - 1);
            prop_assert!(overlaps(outer, inner));
        }
    }
}
