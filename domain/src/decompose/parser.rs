//! Task-block parsing from LLM responses.
//!
//! The decomposition prompt instructs the model to separate atomic tasks
//! with `@@@@` on its own line. This parser turns one such response into an
//! ordered sequence of [`TaskBlock`]s and is total: malformed input degrades
//! (segments are dropped and counted), it never fails.
//!
//! The split is textual on the exact token [`TASK_DELIMITER`]; a delimiter
//! appearing mid-line does not split. That the model emits the token on its
//! own line is a protocol contract enforced by the prompt, not validated
//! here.

use serde::{Deserialize, Serialize};

/// Delimiter token separating tasks in a decomposition response.
pub const TASK_DELIMITER: &str = "\n@@@@\n";

/// The delimiter as the model is told to write it (an isolated line).
pub const TASK_DELIMITER_LINE: &str = "@@@@";

/// One parsed atomic work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBlock {
    /// First line of the segment, trimmed. Never empty.
    pub title: String,
    /// Remaining lines rejoined with newlines and trimmed. May be empty.
    pub description: String,
}

impl TaskBlock {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Result of a parse: the blocks in source order plus a degradation signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTasks {
    pub blocks: Vec<TaskBlock>,
    /// Segments discarded because they were empty or had a blank title.
    /// Non-zero values indicate prompt drift worth surfacing to operators.
    pub dropped_segments: usize,
}

impl ParsedTasks {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

/// Parse a decomposition response into ordered task blocks.
///
/// Each delimiter-separated segment is trimmed; the first line becomes the
/// title and the remaining lines the description. Segments that are empty
/// after trimming, or whose title trims to empty, are dropped and counted.
///
/// A response with no delimiter yields exactly one block (the whole trimmed
/// text); an empty or whitespace-only response yields zero blocks.
pub fn parse_task_blocks(response: &str) -> ParsedTasks {
    let mut parsed = ParsedTasks::default();

    for segment in response.split(TASK_DELIMITER) {
        let segment = segment.trim();
        if segment.is_empty() {
            // Whole-input whitespace is not degradation, an empty slot
            // between two delimiters is.
            if !response.trim().is_empty() {
                parsed.dropped_segments += 1;
            }
            continue;
        }

        let mut lines = segment.lines();
        let title = match lines.next() {
            Some(first) => first.trim().to_string(),
            None => {
                parsed.dropped_segments += 1;
                continue;
            }
        };
        if title.is_empty() {
            parsed.dropped_segments += 1;
            continue;
        }

        let description = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        parsed.blocks.push(TaskBlock::new(title, description));
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_segments_in_order() {
        let response = "First task\nDo the thing\n@@@@\nSecond task\nDo the other thing\n@@@@\nThird task";
        let parsed = parse_task_blocks(response);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.dropped_segments, 0);
        assert_eq!(parsed.blocks[0].title, "First task");
        assert_eq!(parsed.blocks[0].description, "Do the thing");
        assert_eq!(parsed.blocks[1].title, "Second task");
        assert_eq!(parsed.blocks[2].title, "Third task");
        assert_eq!(parsed.blocks[2].description, "");
    }

    #[test]
    fn test_parse_empty_input_yields_nothing() {
        assert!(parse_task_blocks("").is_empty());
        assert_eq!(parse_task_blocks("").dropped_segments, 0);
    }

    #[test]
    fn test_parse_whitespace_only_yields_nothing() {
        let parsed = parse_task_blocks("   \n\n");
        assert!(parsed.is_empty());
        assert_eq!(parsed.dropped_segments, 0);
    }

    #[test]
    fn test_parse_without_delimiter_yields_single_block() {
        let parsed = parse_task_blocks("OnlyTitleNoDelimiter");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.blocks[0].title, "OnlyTitleNoDelimiter");
        assert_eq!(parsed.blocks[0].description, "");
    }

    #[test]
    fn test_parse_multiline_block_splits_title_and_description() {
        let parsed = parse_task_blocks("Add retry\nImplement exponential backoff\nAdd unit test");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.blocks[0].title, "Add retry");
        assert_eq!(
            parsed.blocks[0].description,
            "Implement exponential backoff\nAdd unit test"
        );
    }

    #[test]
    fn test_mid_line_delimiter_does_not_split() {
        let parsed = parse_task_blocks("Escape @@@@ sequences in titles\nDetails here");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.blocks[0].title, "Escape @@@@ sequences in titles");
    }

    #[test]
    fn test_empty_segment_is_dropped_and_counted() {
        let response = "Task A\n@@@@\n\n@@@@\nTask B";
        let parsed = parse_task_blocks(response);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.dropped_segments, 1);
    }

    #[test]
    fn test_trailing_delimiter_counts_as_degradation() {
        let parsed = parse_task_blocks("Task A\ndetails\n@@@@\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.dropped_segments, 1);
    }

    #[test]
    fn test_segment_titles_are_trimmed() {
        let parsed = parse_task_blocks("   Task A   \n  indented detail  ");
        assert_eq!(parsed.blocks[0].title, "Task A");
        assert_eq!(parsed.blocks[0].description, "indented detail");
    }
}
