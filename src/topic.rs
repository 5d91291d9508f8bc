use strum::{Display, EnumString};

pub const MIN_TOPIC_LEN: usize = 2;
pub const MAX_TOPIC_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
    #[error("Vui lòng nhập chủ đề cho bài thơ")]
    Empty,
    #[error("Chủ đề phải có ít nhất 2 ký tự")]
    TooShort,
    #[error("Chủ đề không được vượt quá 100 ký tự")]
    TooLong,
}

/// A trimmed poem topic whose length has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    /// Length is counted in UTF-16 code units, as a browser form would.
    pub fn parse(raw: &str) -> Result<Self, TopicError> {
        let topic = raw.trim();
        let length = topic.encode_utf16().count();

        if length == 0 {
            Err(TopicError::Empty)
        } else if length < MIN_TOPIC_LEN {
            Err(TopicError::TooShort)
        } else if length > MAX_TOPIC_LEN {
            Err(TopicError::TooLong)
        } else {
            Ok(Self(topic.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Poem length offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
pub enum LineCount {
    #[strum(serialize = "4")]
    Four,
    #[default]
    #[strum(serialize = "8")]
    Eight,
}

impl LineCount {
    pub fn count(self) -> u8 {
        match self {
            LineCount::Four => 4,
            LineCount::Eight => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_is_trimmed() {
        assert_eq!(Topic::parse("  mùa thu \n").unwrap().as_str(), "mùa thu");
    }

    #[test]
    fn blank_topic_is_rejected() {
        assert_eq!(Topic::parse("   "), Err(TopicError::Empty));
        assert_eq!(
            TopicError::Empty.to_string(),
            "Vui lòng nhập chủ đề cho bài thơ"
        );
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert_eq!(Topic::parse("ạ"), Err(TopicError::TooShort));
        assert!(Topic::parse("ao").is_ok());
        assert!(Topic::parse(&"ă".repeat(MAX_TOPIC_LEN)).is_ok());
        assert_eq!(
            Topic::parse(&"ă".repeat(MAX_TOPIC_LEN + 1)),
            Err(TopicError::TooLong)
        );
    }

    #[test]
    fn line_count_parses_from_digits() {
        assert_eq!("4".parse::<LineCount>().unwrap(), LineCount::Four);
        assert_eq!("8".parse::<LineCount>().unwrap().count(), 8);
        assert!("6".parse::<LineCount>().is_err());
        assert_eq!(LineCount::default(), LineCount::Eight);
        assert_eq!(LineCount::Four.to_string(), "4");
    }
}
