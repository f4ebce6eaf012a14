use crate::models::Problem;

/// Default budget for the main sequence of problems.
pub const MAX_ATTEMPTS_MAIN: u32 = 3;

/// Budget for exploratory problems that are effectively unlimited.
pub const MAX_ATTEMPTS_OPEN: u32 = 100;

/// Hard-coded problem content. This service is not a quiz-authoring
/// framework: the catalog is fixed at build time and shared by all teams.
pub struct ProblemCatalog {
    problems: Vec<Problem>,
}

impl ProblemCatalog {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    pub fn get(&self, problem_id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == problem_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl Default for ProblemCatalog {
    fn default() -> Self {
        Self::new(builtin_problems())
    }
}

fn problem(id: &str, title: &str, statement: &str, answer: &str, max_attempts: u32) -> Problem {
    Problem {
        id: id.to_string(),
        title: title.to_string(),
        statement: statement.to_string(),
        answer: answer.to_string(),
        max_attempts,
    }
}

/// The built-in gauntlet: four limited trials and one open practice problem.
fn builtin_problems() -> Vec<Problem> {
    vec![
        problem(
            "q1_sequence",
            "Trial of Order",
            "Arrange the four panels in chronological order, earliest first. \
             Answer with the panel numbers, e.g. 1-2-3-4.",
            "1-3-4-2",
            MAX_ATTEMPTS_MAIN,
        ),
        problem(
            "q2_pattern",
            "Trial of Patterns",
            "The series runs 2, 6, 18, 54, ... What is the next number?",
            "162",
            MAX_ATTEMPTS_MAIN,
        ),
        problem(
            "q3_cipher",
            "Trial of Ciphers",
            "Each letter was shifted forward by three. Decode: FDVWOH.",
            "CASTLE",
            MAX_ATTEMPTS_MAIN,
        ),
        problem(
            "q4_truth",
            "Trial of Truth",
            "One guard always lies, one always tells the truth. Both said \
             'the left door is safe'. Which door do you open?",
            "right",
            MAX_ATTEMPTS_MAIN,
        ),
        problem(
            "q5_open",
            "Open Practice",
            "Warm-up with no real limit: how many minutes are in a day?",
            "1440",
            MAX_ATTEMPTS_OPEN,
        ),
    ]
}
