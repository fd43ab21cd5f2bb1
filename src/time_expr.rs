use chrono::Weekday;
use serde::Serialize;

/// Granularity of a time value, ordered from finest to coarsest.
///
/// `NoGrain` is the grain of "now": an exact instant with no calendar unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    NoGrain,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

struct GrainInfo {
    name: &'static str,
    finer: Option<Grain>,
    reset_to: Grain,
    /// Nominal length, used to turn fractional amounts into a finer grain.
    seconds: i64,
}

// Indexed by `Grain as usize`.
const GRAINS: [GrainInfo; 9] = [
    GrainInfo { name: "nograin", finer: None, reset_to: Grain::NoGrain, seconds: 0 },
    GrainInfo { name: "second", finer: None, reset_to: Grain::Second, seconds: 1 },
    GrainInfo { name: "minute", finer: Some(Grain::Second), reset_to: Grain::Minute, seconds: 60 },
    GrainInfo { name: "hour", finer: Some(Grain::Minute), reset_to: Grain::Hour, seconds: 3_600 },
    GrainInfo { name: "day", finer: Some(Grain::Hour), reset_to: Grain::Day, seconds: 86_400 },
    GrainInfo { name: "week", finer: None, reset_to: Grain::Week, seconds: 604_800 },
    GrainInfo { name: "month", finer: Some(Grain::Day), reset_to: Grain::Month, seconds: 2_592_000 },
    GrainInfo { name: "quarter", finer: None, reset_to: Grain::Year, seconds: 7_776_000 },
    GrainInfo { name: "year", finer: Some(Grain::Month), reset_to: Grain::Year, seconds: 31_536_000 },
];

fn info(grain: Grain) -> &'static GrainInfo {
    &GRAINS[grain as usize]
}

/// The next finer calendar unit, if `grain` has one.
///
/// `Year → Month → Day → Hour → Minute → Second`; `Second`, `Week`, `Quarter`
/// and `NoGrain` have no successor.
pub fn finer(grain: Grain) -> Option<Grain> {
    info(grain).finer
}

/// Anchor grain to normalize to before doing arithmetic in `grain`.
///
/// Quarters do not compose additively with months and years, so quarter
/// arithmetic starts from a year boundary. Every other grain maps to itself.
pub fn reset_to(grain: Grain) -> Grain {
    info(grain).reset_to
}

impl Grain {
    pub fn name(self) -> &'static str {
        info(self).name
    }

    /// Nominal number of seconds in one unit (months are 30 days).
    pub fn seconds(self) -> i64 {
        info(self).seconds
    }

    pub fn is_finer_than(self, other: Grain) -> bool {
        self < other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfDay {
    /// 凌晨
    EarlyMorning,
    /// 早上, 早晨, 清晨
    Morning,
    /// 上午
    Forenoon,
    /// 中午
    Noon,
    /// 下午
    Afternoon,
    /// 傍晚
    Dusk,
    /// 晚上
    Evening,
    /// 深夜, 半夜
    LateNight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Holiday {
    NewYearsDay,
    ValentinesDay,
    WomensDay,
    QingMing,
    LabourDay,
    ChildrensDay,
    TeachersDay,
    NationalDay,
    Christmas,
    SpringFestival,
    LanternFestival,
    DragonBoat,
    Qixi,
    MidAutumn,
    DoubleNinth,
    NewYearsEve,
}

/// Which third of a period: 月初 / 月中 / 月底, 年初 / 年底.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodPart {
    Early,
    Mid,
    Late,
}

/// Unresolved time expression built by the rules.
///
/// Resolution against a reference instant lives in
/// `rules::time::normalize`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeExpr {
    /// The reference instant itself (现在).
    Reference,
    /// The `grain` cycle containing the reference, moved by `offset` cycles
    /// (今天 = Day/0, 下个月 = Month/+1, 去年 = Year/-1).
    Cycle { grain: Grain, offset: i32 },
    /// Calendar fields; missing coarser fields are filled with the nearest
    /// occurrence that is not in the past.
    Date { year: Option<i32>, month: Option<u32>, day: Option<u32> },
    /// A date in the Chinese lunisolar calendar.
    Lunar { year: Option<i32>, month: u32, day: u32, leap: bool },
    /// 周三 (`week_offset = None`, next occurrence) or 下周三 (`Some(1)`).
    Weekday { weekday: Weekday, week_offset: Option<i32> },
    /// 周末: Saturday 00:00 until Monday 00:00.
    Weekend { week_offset: Option<i32> },
    /// Clock time. `ambiguous` hours (1..=12 without 上午/下午) may mean
    /// either half of the day.
    TimeOfDay { hour: u32, minute: Option<u32>, second: Option<u32>, ambiguous: bool },
    PartOfDay(PartOfDay),
    Quarter { year: Option<i32>, quarter: u32 },
    Season(Season),
    Holiday(Holiday),
    /// A third of the period resolved by `base`.
    Part { base: Box<TimeExpr>, part: PeriodPart },
    /// `amount` units of `grain` after (or before, if negative) `expr`.
    Shift { expr: Box<TimeExpr>, amount: i64, grain: Grain },
    /// Recency window: 过去三天 (`past`) / 未来三天.
    Window { amount: i64, grain: Grain, past: bool },
    /// `inner` constrained to lie within `outer`.
    Intersect { outer: Box<TimeExpr>, inner: Box<TimeExpr> },
    Interval { start: Box<TimeExpr>, end: Box<TimeExpr> },
}

impl TimeExpr {
    pub fn intersect(outer: TimeExpr, inner: TimeExpr) -> TimeExpr {
        TimeExpr::Intersect { outer: Box::new(outer), inner: Box::new(inner) }
    }
}

/// Time payload of a node: the expression plus whether it is latent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TimeData {
    pub expr: TimeExpr,
    pub latent: bool,
}

impl TimeData {
    pub fn new(expr: TimeExpr) -> Self {
        TimeData { expr, latent: false }
    }

    pub fn latent(expr: TimeExpr) -> Self {
        TimeData { expr, latent: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Grain; 9] = [
        Grain::NoGrain,
        Grain::Second,
        Grain::Minute,
        Grain::Hour,
        Grain::Day,
        Grain::Week,
        Grain::Month,
        Grain::Quarter,
        Grain::Year,
    ];

    #[test]
    fn finer_follows_calendar_chain() {
        assert_eq!(finer(Grain::Year), Some(Grain::Month));
        assert_eq!(finer(Grain::Month), Some(Grain::Day));
        assert_eq!(finer(Grain::Day), Some(Grain::Hour));
        assert_eq!(finer(Grain::Hour), Some(Grain::Minute));
        assert_eq!(finer(Grain::Minute), Some(Grain::Second));
        for grain in [Grain::Second, Grain::Week, Grain::Quarter, Grain::NoGrain] {
            assert_eq!(finer(grain), None, "{grain:?}");
        }
    }

    #[test]
    fn finer_is_strictly_finer() {
        for grain in ALL {
            if let Some(f) = finer(grain) {
                assert!(f.is_finer_than(grain), "{f:?} vs {grain:?}");
            }
        }
    }

    #[test]
    fn reset_to_only_moves_quarter_and_is_idempotent() {
        for grain in ALL {
            assert_eq!(reset_to(reset_to(grain)), reset_to(grain));
            if grain != Grain::Quarter {
                assert_eq!(reset_to(grain), grain);
            }
        }
        assert_eq!(reset_to(Grain::Quarter), Grain::Year);
    }

    #[test]
    fn table_names_match_variants() {
        assert_eq!(Grain::Quarter.name(), "quarter");
        assert_eq!(Grain::Hour.seconds(), 3_600);
    }
}
