//! Free-text command classification
//!
//! Commands arrive as plain chat text, often mixed English/Tagalog. Matching
//! is case-insensitive substring search over fixed keyword tables, checked in
//! priority order: a new-task phrase wins over a resume phrase, which wins
//! over a status phrase. Anything else means "keep going with what you have".

/// What a piece of free text is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Start something new, interrupting the current task if any
    NewTask,
    /// Bring every interrupted task back
    Resume,
    /// Read-only snapshot of the focus state
    Status,
    /// No recognized command; carry on with the current task
    Continue,
}

const NEW_TASK_KEYWORDS: &[&str] = &[
    "new task",
    "start task",
    "create",
    "implement",
    "build",
    "fix",
    "write",
    "refactor",
    "gumawa",
    "gawin",
    "bagong",
    "simulan",
    "ayusin",
    "idagdag",
    "buuin",
];

const RESUME_KEYWORDS: &[&str] = &[
    "resume",
    "continue previous",
    "go back",
    "pick up",
    "balik",
    "ituloy",
    "ipagpatuloy",
];

const STATUS_KEYWORDS: &[&str] = &[
    "status",
    "progress",
    "where are we",
    "what's left",
    "ano na",
    "kamusta",
    "estado",
    "saan na",
];

/// Classify free text. Priority is fixed: text matching both a new-task and a
/// resume keyword is a new task.
pub fn classify(text: &str) -> CommandKind {
    let lowered = text.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if matches(NEW_TASK_KEYWORDS) {
        CommandKind::NewTask
    } else if matches(RESUME_KEYWORDS) {
        CommandKind::Resume
    } else if matches(STATUS_KEYWORDS) {
        CommandKind::Status
    } else {
        CommandKind::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_keywords() {
        assert_eq!(classify("implement the cache layer"), CommandKind::NewTask);
        assert_eq!(classify("Fix the login redirect"), CommandKind::NewTask);
        assert_eq!(classify("gumawa ng bagong report"), CommandKind::NewTask);
    }

    #[test]
    fn test_resume_keywords() {
        assert_eq!(classify("resume"), CommandKind::Resume);
        assert_eq!(classify("ituloy mo yung dati"), CommandKind::Resume);
        assert_eq!(classify("balikan natin yung nauna"), CommandKind::Resume);
    }

    #[test]
    fn test_status_keywords() {
        assert_eq!(classify("status?"), CommandKind::Status);
        assert_eq!(classify("kamusta na?"), CommandKind::Status);
        assert_eq!(classify("saan na tayo"), CommandKind::Status);
    }

    #[test]
    fn test_new_task_outranks_resume() {
        // "resume" and "implement" both match; new-task wins
        assert_eq!(
            classify("resume work and implement the cache"),
            CommandKind::NewTask
        );
    }

    #[test]
    fn test_resume_outranks_status() {
        assert_eq!(
            classify("resume and give me a status update"),
            CommandKind::Resume
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("IMPLEMENT THIS NOW"), CommandKind::NewTask);
        assert_eq!(classify("RESUME"), CommandKind::Resume);
    }

    #[test]
    fn test_unrecognized_text_continues() {
        assert_eq!(classify("okay"), CommandKind::Continue);
        assert_eq!(classify("sige"), CommandKind::Continue);
        assert_eq!(classify(""), CommandKind::Continue);
    }
}
