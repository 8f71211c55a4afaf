#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    ClockIn,
    LunchStart,
    LunchEnd,
    ClockOut,
}

/// Label vocabulary written to the `Action` column of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSet {
    Chinese,
    English,
}

impl LabelSet {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "zh" | "zh-hk" | "zh-tw" | "chinese" => Some(LabelSet::Chinese),
            "en" | "english" => Some(LabelSet::English),
            _ => None,
        }
    }
}

impl AttendanceAction {
    pub const ALL: [AttendanceAction; 4] = [
        AttendanceAction::ClockIn,
        AttendanceAction::LunchStart,
        AttendanceAction::LunchEnd,
        AttendanceAction::ClockOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceAction::ClockIn => "CLOCK_IN",
            AttendanceAction::LunchStart => "LUNCH_START",
            AttendanceAction::LunchEnd => "LUNCH_END",
            AttendanceAction::ClockOut => "CLOCK_OUT",
        }
    }

    pub fn label(&self, labels: LabelSet) -> &'static str {
        match labels {
            LabelSet::English => self.as_str(),
            LabelSet::Chinese => match self {
                AttendanceAction::ClockIn => "上班",
                AttendanceAction::LunchStart => "午飯開始",
                AttendanceAction::LunchEnd => "午飯結束",
                AttendanceAction::ClockOut => "下班",
            },
        }
    }

    /// Recognises a stored label from either label set.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|action| {
            action.as_str().eq_ignore_ascii_case(label)
                || action.label(LabelSet::Chinese) == label
        })
    }

    /// The clock-in cycle: CLOCK_IN -> LUNCH_START -> LUNCH_END -> CLOCK_OUT -> CLOCK_IN.
    pub fn next(&self) -> Self {
        match self {
            AttendanceAction::ClockIn => AttendanceAction::LunchStart,
            AttendanceAction::LunchStart => AttendanceAction::LunchEnd,
            AttendanceAction::LunchEnd => AttendanceAction::ClockOut,
            AttendanceAction::ClockOut => AttendanceAction::ClockIn,
        }
    }
}

/// The most recent action found in a user's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastAction {
    NoHistory,
    Recorded(AttendanceAction),
    Unrecognized(String),
}

impl LastAction {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None => LastAction::NoHistory,
            Some(label) => match AttendanceAction::from_label(label) {
                Some(action) => LastAction::Recorded(action),
                None => LastAction::Unrecognized(label.to_string()),
            },
        }
    }
}
