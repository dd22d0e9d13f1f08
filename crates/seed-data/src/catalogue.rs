//! Fixed reference data used by the generator.

/// Department names paired with their campus location.
pub const DEPARTMENTS: [(&str, &str); 8] = [
    ("Computer Science", "Building A"),
    ("Mathematics", "Building B"),
    ("Physics", "Building C"),
    ("Business", "Building D"),
    ("Arts", "Building E"),
    ("Engineering", "Science Wing"),
    ("Biology", "Tech Center"),
    ("Chemistry", "Main Campus"),
];

/// Course subjects cycled through when naming generated courses.
pub const COURSE_SUBJECTS: [&str; 30] = [
    "Introduction to Programming",
    "Data Structures",
    "Algorithms",
    "Database Systems",
    "Web Development",
    "Calculus I",
    "Calculus II",
    "Linear Algebra",
    "Statistics",
    "Discrete Mathematics",
    "Physics I",
    "Physics II",
    "Quantum Mechanics",
    "Thermodynamics",
    "Electromagnetism",
    "Business Management",
    "Marketing",
    "Finance",
    "Economics",
    "Accounting",
    "Art History",
    "Drawing",
    "Painting",
    "Sculpture",
    "Digital Art",
    "Software Engineering",
    "Machine Learning",
    "Artificial Intelligence",
    "Computer Networks",
    "Cybersecurity",
];

/// Produce `count` course names.
///
/// Subjects are used in order; once exhausted, later rounds get a numeric
/// suffix starting at 2 (`"Algorithms 2"`).
pub(crate) fn course_names(count: usize) -> Vec<String> {
    (1_usize..)
        .flat_map(|round| COURSE_SUBJECTS.iter().map(move |subject| (round, *subject)))
        .take(count)
        .map(|(round, subject)| {
            if round == 1 {
                subject.to_owned()
            } else {
                format!("{subject} {round}")
            }
        })
        .collect()
}
