//! Sample course notes loaded into a fresh workspace.

use crate::domain::{FileType, Note};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub fn sample_notes() -> Vec<Note> {
    vec![
        sample(
            "Introduction to React Hooks",
            "Computer Science",
            "This document covers the basics of React Hooks like useState, useEffect, and useContext. It provides code examples and best practices for functional components.",
            "react_hooks_intro.txt",
            at(2023, 10, 26, 10, 0),
            true,
            "Review the section on custom hooks for the upcoming project.",
        ),
        sample(
            "The Renaissance Period",
            "History",
            "A comprehensive overview of the Renaissance, focusing on its origins in Italy and its impact on art, science, and culture across Europe. Key figures like Leonardo da Vinci and Michelangelo are discussed.",
            "renaissance_overview.txt",
            at(2023, 10, 25, 14, 30),
            false,
            "",
        ),
        sample(
            "Quantum Mechanics Fundamentals",
            "Physics",
            "This note explains the foundational principles of quantum mechanics, including wave-particle duality, superposition, and quantum entanglement. It is intended for undergraduate physics students.",
            "quantum_mechanics.txt",
            at(2023, 10, 27, 9, 0),
            false,
            "Important for the final exam. Focus on the double-slit experiment.",
        ),
    ]
}

fn sample(
    title: &str,
    subject: &str,
    content: &str,
    file_name: &str,
    uploaded_at: DateTime<Utc>,
    is_bookmarked: bool,
    student_note: &str,
) -> Note {
    Note {
        id: Uuid::new_v4(),
        title: title.to_string(),
        subject: subject.to_string(),
        content: content.to_string(),
        file_type: FileType::Text,
        file_name: file_name.to_string(),
        uploaded_at,
        is_bookmarked,
        student_note: student_note.to_string(),
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}
