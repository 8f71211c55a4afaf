use crate::attendance::action::{AttendanceAction, LabelSet};

pub fn format_error_message(error: &str) -> String {
    format!("❌ {}", error)
}

pub fn format_success_message(message: &str) -> String {
    format!("✅ {}", message)
}

pub fn format_info_message(message: &str) -> String {
    format!("💡 {}", message)
}

pub fn login_success(labels: LabelSet) -> String {
    match labels {
        LabelSet::Chinese => format_success_message("登入成功！"),
        LabelSet::English => format_success_message("Signed in"),
    }
}

pub fn login_rejected(labels: LabelSet, domain: &str) -> String {
    match labels {
        LabelSet::Chinese => format_error_message(&format!("只限 @{} 員工使用", domain)),
        LabelSet::English => {
            format_error_message(&format!("Only @{} staff may use this kiosk", domain))
        }
    }
}

pub fn logged_out(labels: LabelSet) -> String {
    match labels {
        LabelSet::Chinese => format_info_message("已登出"),
        LabelSet::English => format_info_message("Signed out"),
    }
}

pub fn session_required(labels: LabelSet) -> String {
    match labels {
        LabelSet::Chinese => format_error_message("請先登入"),
        LabelSet::English => format_error_message("Please sign in first"),
    }
}

pub fn punch_success(labels: LabelSet, action: AttendanceAction, time: &str) -> String {
    match labels {
        LabelSet::Chinese => {
            format_success_message(&format!("打卡成功! {} @ {}", action.label(labels), time))
        }
        LabelSet::English => {
            format_success_message(&format!("Recorded {} @ {}", action.label(labels), time))
        }
    }
}

pub fn punch_failed(labels: LabelSet, reason: &str) -> String {
    match labels {
        LabelSet::Chinese => format_error_message(&format!("寫入失敗: {}", reason)),
        LabelSet::English => format_error_message(&format!("Could not save the record: {}", reason)),
    }
}

pub fn location_not_ready(labels: LabelSet, reason: &str) -> String {
    match labels {
        LabelSet::Chinese => format_error_message(&format!("未能鎖定座標，請重新定位 ({})", reason)),
        LabelSet::English => format_error_message(&format!("Location not ready, please retry ({})", reason)),
    }
}

pub fn location_locked(labels: LabelSet, location: &str) -> String {
    match labels {
        LabelSet::Chinese => format_success_message(&format!("成功鎖定座標: {}", location)),
        LabelSet::English => format_success_message(&format!("Location locked: {}", location)),
    }
}

pub fn unknown_action(labels: LabelSet, action: &str) -> String {
    match labels {
        LabelSet::Chinese => format_error_message(&format!("未知的動作: {}", action)),
        LabelSet::English => format_error_message(&format!("Unknown action: {}", action)),
    }
}

pub fn history_unavailable(labels: LabelSet) -> String {
    match labels {
        LabelSet::Chinese => "讀取紀錄時發生輕微錯誤".to_string(),
        LabelSet::English => "Could not reach the record store; showing defaults".to_string(),
    }
}

pub fn status_message(labels: LabelSet, records: usize) -> String {
    match (labels, records) {
        (LabelSet::Chinese, 0) => format_info_message("暫時未有紀錄"),
        (LabelSet::English, 0) => format_info_message("No records yet"),
        (LabelSet::Chinese, n) => format_info_message(&format!("最近紀錄 {} 筆", n)),
        (LabelSet::English, n) => format_info_message(&format!("{} recent records", n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punch_message_uses_configured_labels() {
        assert_eq!(
            punch_success(LabelSet::Chinese, AttendanceAction::ClockIn, "2025-03-14 09:00:00"),
            "✅ 打卡成功! 上班 @ 2025-03-14 09:00:00"
        );
        assert_eq!(
            punch_success(LabelSet::English, AttendanceAction::ClockOut, "2025-03-14 18:00:00"),
            "✅ Recorded CLOCK_OUT @ 2025-03-14 18:00:00"
        );
    }

    #[test]
    fn rejection_names_the_domain() {
        assert_eq!(
            login_rejected(LabelSet::Chinese, "decathlon.com"),
            "❌ 只限 @decathlon.com 員工使用"
        );
    }
}
