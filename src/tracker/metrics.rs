use std::collections::HashMap;
use std::fmt;

/// The three transport operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Submit,
    Status,
    Fetch,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Submit, Operation::Status, Operation::Fetch];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Submit => "submit",
            Operation::Status => "status",
            Operation::Fetch => "fetch",
        }
    }
}

/// Per-operation success/failure counters for transport calls
#[derive(Debug, Clone, Default)]
pub struct CallMetrics {
    success_counts: HashMap<Operation, u64>,
    failure_counts: HashMap<Operation, u64>,
}

impl CallMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, operation: Operation, succeeded: bool) {
        if succeeded {
            self.record_success(operation);
        } else {
            self.record_failure(operation);
        }
    }

    pub fn record_success(&mut self, operation: Operation) {
        *self.success_counts.entry(operation).or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, operation: Operation) {
        *self.failure_counts.entry(operation).or_insert(0) += 1;
    }

    pub fn get_success_count(&self, operation: Operation) -> u64 {
        *self.success_counts.get(&operation).unwrap_or(&0)
    }

    pub fn get_failure_count(&self, operation: Operation) -> u64 {
        *self.failure_counts.get(&operation).unwrap_or(&0)
    }

    pub fn calls(&self, operation: Operation) -> u64 {
        self.get_success_count(operation) + self.get_failure_count(operation)
    }

    pub fn total_calls(&self) -> u64 {
        Operation::ALL.iter().map(|op| self.calls(*op)).sum()
    }
}

impl fmt::Display for CallMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Operation::ALL
            .iter()
            .map(|op| {
                format!(
                    "{} {} ok/{} failed",
                    op.as_str(),
                    self.get_success_count(*op),
                    self.get_failure_count(*op)
                )
            })
            .collect();
        f.write_str(&parts.join(", "))
    }
}
