//! Stage keys accepted in planning requests.

use crate::pipeline::domain::TaskStatus;

/// Resolves a request's stage key to the status whose stage receives the
/// batch.
///
/// Portuguese and English keys are accepted, accented or not. Absent or
/// unknown keys resolve to [`TaskStatus::Idea`].
#[must_use]
pub fn status_for_stage_key(key: Option<&str>) -> TaskStatus {
    let Some(raw) = key else {
        return TaskStatus::Idea;
    };
    match raw.trim().to_lowercase().as_str() {
        "rascunho" | "rascunhos" | "draft" | "drafts" => TaskStatus::Draft,
        "revisao" | "revisão" | "review" => TaskStatus::Review,
        "aprovado" | "aprovados" | "approved" => TaskStatus::Approved,
        "agendado" | "agendados" | "scheduled" => TaskStatus::Scheduled,
        _ => TaskStatus::Idea,
    }
}

#[cfg(test)]
mod tests {
    use super::status_for_stage_key;
    use crate::pipeline::domain::TaskStatus;
    use rstest::rstest;

    #[rstest]
    #[case(None, TaskStatus::Idea)]
    #[case(Some("ideias"), TaskStatus::Idea)]
    #[case(Some("Rascunho"), TaskStatus::Draft)]
    #[case(Some("revisão"), TaskStatus::Review)]
    #[case(Some("revisao"), TaskStatus::Review)]
    #[case(Some("aprovado"), TaskStatus::Approved)]
    #[case(Some(" agendado "), TaskStatus::Scheduled)]
    #[case(Some("publicado"), TaskStatus::Idea)]
    fn resolves_stage_keys(#[case] key: Option<&str>, #[case] expected: TaskStatus) {
        assert_eq!(status_for_stage_key(key), expected);
    }
}
