//! Observable query events

use std::fmt;

/// Events logged while building and evaluating queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Evaluation started
    QueryBegin,
    /// Operators sorted into execution order
    QueryOrdered,
    /// One operator applied
    QueryStage,
    /// Evaluation finished
    QueryComplete,
    /// Evaluation scope dropped before completion
    QueryIncomplete,
    /// Query description parsed and built
    DescriptionLoaded,
    /// Query description rejected
    DescriptionRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::QueryBegin => "QUERY_BEGIN",
            Event::QueryOrdered => "QUERY_ORDERED",
            Event::QueryStage => "QUERY_STAGE",
            Event::QueryComplete => "QUERY_COMPLETE",
            Event::QueryIncomplete => "QUERY_INCOMPLETE",
            Event::DescriptionLoaded => "DESCRIPTION_LOADED",
            Event::DescriptionRejected => "DESCRIPTION_REJECTED",
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::DescriptionRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
