use crate::course::Course;
use crate::store::{KeyValueStore, keys};

/// Storage prefix for a lesson page: the last path segment of its href,
/// without the `.html` suffix, lowercased.
pub fn key_prefix(href: &str) -> String {
    let file = href.rsplit('/').next().unwrap_or(href);
    file.replacen(".html", "", 1).to_lowercase()
}

pub fn is_lesson_complete(store: &dyn KeyValueStore, prefix: &str, tasks_per_lesson: usize) -> bool {
    (0..tasks_per_lesson).all(|i| store.get_flag(&keys::task_done(prefix, i)))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonEntry {
    pub title: String,
    pub prefix: Option<String>,
    pub complete: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEntry {
    pub title: String,
    pub lessons: Vec<LessonEntry>,
    pub complete: bool,
    pub expanded: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexRow {
    Category(usize),
    Lesson(usize, usize),
}

/// What the user asked for by activating the focused row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Toggled(usize),
    OpenLesson(usize, usize),
    None,
}

/// Accordion over the course categories. At most one category is expanded.
#[derive(Clone, Debug)]
pub struct LessonIndex {
    pub categories: Vec<CategoryEntry>,
    focus: usize,
    /// Category whose header should sit at the top of the viewport.
    pub scroll_to: Option<usize>,
}

impl LessonIndex {
    /// Build the index from stored completion flags. When any lesson is
    /// already done, the first incomplete category is expanded and scrolled to.
    pub fn load(course: &Course, store: &dyn KeyValueStore) -> Self {
        let categories = course
            .categories
            .iter()
            .map(|category| {
                let lessons: Vec<LessonEntry> = category
                    .lessons
                    .iter()
                    .map(|link| {
                        let prefix = link.key_prefix();
                        let complete = prefix.as_deref().is_some_and(|p| {
                            is_lesson_complete(store, p, course.tasks_per_lesson)
                        });
                        LessonEntry {
                            title: link.title.clone(),
                            prefix,
                            complete,
                        }
                    })
                    .collect();
                CategoryEntry {
                    title: category.title.clone(),
                    complete: lessons.iter().all(|l| l.complete),
                    lessons,
                    expanded: false,
                }
            })
            .collect();

        let mut index = Self {
            categories,
            focus: 0,
            scroll_to: None,
        };

        if index.any_lesson_complete()
            && let Some(first) = index.first_incomplete_category()
        {
            index.categories[first].expanded = true;
            index.scroll_to = Some(first);
            index.focus_category(first);
            log::debug!("resuming at category {first}");
        }

        index
    }

    pub fn any_lesson_complete(&self) -> bool {
        self.categories
            .iter()
            .any(|c| c.lessons.iter().any(|l| l.complete))
    }

    pub fn first_incomplete_category(&self) -> Option<usize> {
        self.categories.iter().position(|c| !c.complete)
    }

    pub fn expanded_category(&self) -> Option<usize> {
        self.categories.iter().position(|c| c.expanded)
    }

    /// Open a closed category (closing all others) or close an open one.
    pub fn toggle(&mut self, category: usize) {
        let Some(entry) = self.categories.get(category) else {
            return;
        };
        let was_open = entry.expanded;
        for (i, c) in self.categories.iter_mut().enumerate() {
            c.expanded = i == category && !was_open;
        }
        self.scroll_to = Some(category);
        self.focus_category(category);
    }

    pub fn visible_rows(&self) -> Vec<IndexRow> {
        let mut rows = Vec::new();
        for (ci, category) in self.categories.iter().enumerate() {
            rows.push(IndexRow::Category(ci));
            if category.expanded {
                rows.extend((0..category.lessons.len()).map(|li| IndexRow::Lesson(ci, li)));
            }
        }
        rows
    }

    pub fn focused_row(&self) -> Option<IndexRow> {
        self.visible_rows().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let count = self.visible_rows().len();
        if self.focus + 1 < count {
            self.focus += 1;
        }
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn focus_category(&mut self, category: usize) {
        if let Some(pos) = self
            .visible_rows()
            .iter()
            .position(|r| *r == IndexRow::Category(category))
        {
            self.focus = pos;
        }
    }

    /// Enter on the focused row: toggles a header, opens a lesson.
    pub fn activate(&mut self) -> Activation {
        match self.focused_row() {
            Some(IndexRow::Category(c)) => {
                self.toggle(c);
                Activation::Toggled(c)
            }
            Some(IndexRow::Lesson(c, l)) => Activation::OpenLesson(c, l),
            None => Activation::None,
        }
    }

    /// Space on the focused row: only headers react.
    pub fn activate_header(&mut self) -> Activation {
        match self.focused_row() {
            Some(IndexRow::Category(c)) => {
                self.toggle(c);
                Activation::Toggled(c)
            }
            _ => Activation::None,
        }
    }

    pub fn completed_lessons(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.lessons.iter())
            .filter(|l| l.complete)
            .count()
    }

    pub fn total_lessons(&self) -> usize {
        self.categories.iter().map(|c| c.lessons.len()).sum()
    }
}
