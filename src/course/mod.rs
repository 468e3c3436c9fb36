pub mod index;

use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/courses/"]
struct CourseAssets;

pub const DEFAULT_COURSE: &str = "default";

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("cannot read course file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid course file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("bundled course {0:?} not found")]
    MissingBundled(String),
    #[error("tasks_per_lesson must be at least 1")]
    ZeroTasksPerLesson,
    #[error("lesson {lesson:?} has nothing to type")]
    EmptyStream { lesson: String },
    #[error("task {task} of lesson {lesson:?} has no text to type")]
    EmptyTaskText { lesson: String, task: usize },
}

fn default_tasks_per_lesson() -> usize {
    30
}

#[derive(Clone, Debug, Deserialize)]
pub struct Course {
    pub title: String,
    /// Number of completion flags a lesson needs before the index marks it done.
    #[serde(default = "default_tasks_per_lesson")]
    pub tasks_per_lesson: usize,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Category {
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonLink>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillKind {
    /// One card per task, checked as a whole on every edit.
    #[default]
    Cards,
    /// Character-by-character typing through groups of tasks.
    Stream,
}

/// An entry in the lesson index together with the page it opens.
#[derive(Clone, Debug, Deserialize)]
pub struct LessonLink {
    pub title: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub drill: DrillKind,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl LessonLink {
    pub fn key_prefix(&self) -> Option<String> {
        self.href.as_deref().map(index::key_prefix)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub title: String,
    pub tasks: Vec<Task>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Task {
    pub instruction: String,
    #[serde(alias = "codeToType")]
    pub code_to_type: String,
}

impl Course {
    pub fn from_toml(content: &str) -> Result<Self, CourseError> {
        let course: Course = toml::from_str(content)?;
        course.validate()?;
        Ok(course)
    }

    pub fn from_file(path: &Path) -> Result<Self, CourseError> {
        let content = fs::read_to_string(path).map_err(|source| CourseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn bundled(name: &str) -> Result<Self, CourseError> {
        let file = CourseAssets::get(&format!("{name}.toml"))
            .ok_or_else(|| CourseError::MissingBundled(name.to_string()))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        Self::from_toml(&content)
    }

    /// Course file from `path`, or the bundled default course.
    pub fn load(path: Option<&Path>) -> Result<Self, CourseError> {
        let course = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::bundled(DEFAULT_COURSE)?,
        };
        log::info!(
            "loaded course {:?}: {} categories, {} lessons",
            course.title,
            course.categories.len(),
            course.links().count()
        );
        Ok(course)
    }

    fn validate(&self) -> Result<(), CourseError> {
        if self.tasks_per_lesson == 0 {
            return Err(CourseError::ZeroTasksPerLesson);
        }
        for link in self.links() {
            if link.drill != DrillKind::Stream {
                continue;
            }
            if link.lessons.is_empty() {
                return Err(CourseError::EmptyStream {
                    lesson: link.title.clone(),
                });
            }
            for lesson in &link.lessons {
                if lesson.tasks.is_empty() {
                    return Err(CourseError::EmptyStream {
                        lesson: link.title.clone(),
                    });
                }
                if let Some(task) = lesson.tasks.iter().position(|t| t.code_to_type.is_empty()) {
                    return Err(CourseError::EmptyTaskText {
                        lesson: link.title.clone(),
                        task,
                    });
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for prefix in self.links().filter_map(LessonLink::key_prefix) {
            if !seen.insert(prefix.clone()) {
                log::warn!("lessons share the progress prefix {prefix:?}; their progress will mix");
            }
        }
        Ok(())
    }

    pub fn links(&self) -> impl Iterator<Item = &LessonLink> {
        self.categories.iter().flat_map(|c| c.lessons.iter())
    }

    pub fn link(&self, category: usize, lesson: usize) -> Option<&LessonLink> {
        self.categories.get(category)?.lessons.get(lesson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
title = "Small"
tasks_per_lesson = 2

[[categories]]
title = "Markup"

[[categories.lessons]]
title = "Headings"
href = "html/Headings.html"

[[categories.lessons.tasks]]
instruction = "Type a heading"
code_to_type = "<h1>Hi</h1>"

[[categories.lessons.tasks]]
instruction = "Camel-case key"
codeToType = "<p>x</p>"

[[categories]]
title = "Keys"

[[categories.lessons]]
title = "Home row"
href = "typing/home-row.html"
drill = "stream"

[[categories.lessons.lessons]]
tasks = [{ instruction = "asdf", code_to_type = "asdf" }]
"#;

    #[test]
    fn test_parse_small_course() {
        let course = Course::from_toml(SMALL).unwrap();
        assert_eq!(course.tasks_per_lesson, 2);
        assert_eq!(course.categories.len(), 2);
        let headings = course.link(0, 0).unwrap();
        assert_eq!(headings.drill, DrillKind::Cards);
        assert_eq!(headings.tasks[1].code_to_type, "<p>x</p>");
        assert_eq!(headings.key_prefix().as_deref(), Some("headings"));
        let home = course.link(1, 0).unwrap();
        assert_eq!(home.drill, DrillKind::Stream);
        assert_eq!(home.lessons[0].tasks[0].code_to_type, "asdf");
    }

    #[test]
    fn test_tasks_per_lesson_defaults_to_thirty() {
        let course = Course::from_toml("title = \"t\"").unwrap();
        assert_eq!(course.tasks_per_lesson, 30);
        assert!(course.categories.is_empty());
    }

    #[test]
    fn test_stream_lesson_without_tasks_is_rejected() {
        let toml = r#"
title = "t"
[[categories]]
title = "c"
[[categories.lessons]]
title = "Empty"
href = "e.html"
drill = "stream"
"#;
        let err = Course::from_toml(toml).unwrap_err();
        assert!(matches!(err, CourseError::EmptyStream { .. }));
    }

    #[test]
    fn test_stream_task_without_text_is_rejected() {
        let toml = r#"
title = "t"
[[categories]]
title = "c"
[[categories.lessons]]
title = "Blank"
href = "b.html"
drill = "stream"
[[categories.lessons.lessons]]
tasks = [{ instruction = "i", code_to_type = "ok" }, { instruction = "i", code_to_type = "" }]
"#;
        let err = Course::from_toml(toml).unwrap_err();
        assert!(matches!(err, CourseError::EmptyTaskText { task: 1, .. }));
    }

    #[test]
    fn test_zero_tasks_per_lesson_is_rejected() {
        let err = Course::from_toml("title = \"t\"\ntasks_per_lesson = 0").unwrap_err();
        assert!(matches!(err, CourseError::ZeroTasksPerLesson));
    }

    #[test]
    fn test_bundled_default_course_loads() {
        let course = Course::bundled(DEFAULT_COURSE).unwrap();
        assert!(!course.categories.is_empty());
        assert!(course.links().all(|l| l.href.is_some()));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Course::from_file(Path::new("/nonexistent/course.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/course.toml"));
    }
}
