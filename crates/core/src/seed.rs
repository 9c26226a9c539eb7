//! Built-in catalog shipped with the application.
//!
//! Lessons, projects, resources, and the sign-in user list are fixed at
//! build time and never modified at runtime.

use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::model::{
    Lesson, LessonCategory, LessonError, Project, ProjectDifficulty, ProjectId, QuizOption,
    QuizQuestion, Resource, ResourceCategory, ResourceId, User, UserId, UserRole,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error("invalid seed lesson: {0}")]
    Lesson(#[from] LessonError),
    #[error("invalid seed resource url: {0}")]
    Url(#[from] url::ParseError),
}

/// All read-only seed collections in one place.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub lessons: Vec<Lesson>,
    pub projects: Vec<Project>,
    pub resources: Vec<Resource>,
    pub users: Vec<User>,
}

impl Catalog {
    /// Build the shipped catalog. `now` stamps the seed users' `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if a seed lesson or resource URL fails validation.
    pub fn builtin(now: DateTime<Utc>) -> Result<Self, SeedError> {
        Ok(Self {
            lessons: lessons()?,
            projects: projects(),
            resources: resources()?,
            users: users(now),
        })
    }
}

fn four_options(correct: &str, labels: [&str; 4]) -> Vec<QuizOption> {
    ["a", "b", "c", "d"]
        .into_iter()
        .zip(labels)
        .map(|(id, label)| QuizOption::new(id, label, id == correct))
        .collect()
}

/// # Errors
///
/// Returns `LessonError` if a seed lesson is malformed.
pub fn lessons() -> Result<Vec<Lesson>, LessonError> {
    Ok(vec![
        Lesson::new(
            "lesson-renewable-1",
            "Introduction to Renewable Energy",
            LessonCategory::RenewableEnergy,
            "Understand the basics of renewable energy sources and why they matter.",
            "Renewable energy comes from sources that are naturally replenished, such as \
             sunlight, wind, rain, tides, and geothermal heat. Unlike fossil fuels, renewable \
             sources do not run out on a human time scale and typically produce far fewer \
             greenhouse gas emissions. In this lesson you will explore the main types of \
             renewable energy and how they can replace fossil fuels in electricity, heating, \
             and transportation.",
            vec![
                QuizQuestion::new(
                    "q1",
                    "Which of the following is a renewable energy source?",
                    four_options("c", ["Coal", "Natural gas", "Solar power", "Diesel"]),
                ),
                QuizQuestion::new(
                    "q2",
                    "Why are renewable energy sources important for sustainability?",
                    four_options(
                        "a",
                        [
                            "They reduce greenhouse gas emissions and air pollution.",
                            "They are always cheaper than fossil fuels.",
                            "They work only in warm climates.",
                            "They do not require any infrastructure.",
                        ],
                    ),
                ),
            ],
        )?,
        Lesson::new(
            "lesson-waste-1",
            "Waste Reduction at Home",
            LessonCategory::WasteReduction,
            "Learn how to prevent waste, reuse materials, and recycle correctly.",
            "Reducing waste starts with refusing what you do not need, reusing items you \
             already have, and recycling only when necessary. By analyzing your daily habits, \
             such as food shopping, packaging use, and disposal practices, you can \
             significantly cut the amount of waste that goes to landfill. Small actions like \
             using reusable bags, bottles, and containers make a measurable difference over \
             time.",
            vec![QuizQuestion::new(
                "q1",
                "Which action follows the waste reduction hierarchy most closely?",
                four_options(
                    "b",
                    [
                        "Buying bottled water and recycling the bottles",
                        "Using a reusable water bottle every day",
                        "Throwing plastic in the trash",
                        "Burning waste at home",
                    ],
                ),
            )],
        )?,
        Lesson::new(
            "lesson-lifestyle-1",
            "Eco-Friendly Lifestyle Habits",
            LessonCategory::EcoFriendlyLifestyle,
            "Discover simple daily habits that lower your environmental footprint.",
            "Living an eco-friendly lifestyle means making conscious decisions about what you \
             buy, how you travel, and how you use energy and water. Examples include choosing \
             plant-rich meals, walking or cycling for short trips, and turning off devices \
             when they are not in use. Over time, consistent habits like these can \
             significantly reduce your personal carbon footprint.",
            vec![QuizQuestion::new(
                "q1",
                "Which habit most directly lowers your carbon footprint?",
                four_options(
                    "b",
                    [
                        "Driving alone for every short trip",
                        "Taking a bike or walking when possible",
                        "Leaving lights on all day",
                        "Using disposable cups every day",
                    ],
                ),
            )],
        )?,
    ])
}

#[must_use]
pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: ProjectId::new("project-compost"),
            title: "Start a Home Compost System".into(),
            description: "Design and set up a small compost system at home to turn food scraps \
                          and yard waste into nutrient-rich soil."
                .into(),
            impact: "Diverts organic waste from landfill, reduces methane emissions, and creates \
                     natural fertilizer for plants."
                .into(),
            difficulty: ProjectDifficulty::Intermediate,
            estimated_duration: "2–4 weeks".into(),
        },
        Project {
            id: ProjectId::new("project-energy-audit"),
            title: "Conduct a Home Energy Audit".into(),
            description: "Inspect your home to find where energy is wasted and create a simple \
                          action plan to improve efficiency."
                .into(),
            impact: "Reduces electricity and heating demand, lowers energy bills, and cuts \
                     greenhouse gas emissions."
                .into(),
            difficulty: ProjectDifficulty::Beginner,
            estimated_duration: "1–2 weeks".into(),
        },
        Project {
            id: ProjectId::new("project-plastic-free"),
            title: "Plastic-Free Week Challenge".into(),
            description: "Complete one week of daily life while avoiding single-use plastics \
                          wherever possible and documenting alternatives."
                .into(),
            impact: "Raises awareness about hidden plastics in everyday products and inspires \
                     long-term behavior change."
                .into(),
            difficulty: ProjectDifficulty::Beginner,
            estimated_duration: "1 week".into(),
        },
    ]
}

/// # Errors
///
/// Returns `url::ParseError` if a seed URL is malformed.
pub fn resources() -> Result<Vec<Resource>, url::ParseError> {
    Ok(vec![
        Resource {
            id: ResourceId::new("res-article-1"),
            title: "Beginner’s Guide to Sustainable Living".into(),
            description:
                "A practical article that explains how to start living more sustainably today."
                    .into(),
            url: Url::parse("https://www.un.org/en/climatechange/sustainable-lifestyle")?,
            category: ResourceCategory::Article,
            source: "United Nations Climate Action".into(),
        },
        Resource {
            id: ResourceId::new("res-pdf-1"),
            title: "Household Energy Savings Checklist (PDF)".into(),
            description:
                "A printable checklist of actions you can take to reduce energy use at home."
                    .into(),
            url: Url::parse("https://example.org/energy-savings-checklist.pdf")?,
            category: ResourceCategory::Pdf,
            source: "Local Sustainability Council".into(),
        },
        Resource {
            id: ResourceId::new("res-site-1"),
            title: "Sustainable Development Goal 12 – Responsible Consumption".into(),
            description: "Overview of the United Nations goal focused on sustainable consumption \
                          and production."
                .into(),
            url: Url::parse("https://sdgs.un.org/goals/goal12")?,
            category: ResourceCategory::Website,
            source: "United Nations".into(),
        },
    ])
}

/// Accounts that can sign in by email.
#[must_use]
pub fn users(created_at: DateTime<Utc>) -> Vec<User> {
    vec![User {
        id: UserId::new("admin-1"),
        name: "Admin".into(),
        email: "admin@sustainability.edu".into(),
        role: UserRole::Admin,
        created_at,
    }]
}
