use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers, ModifierKeyCode};
use rust_i18n::t;

use crate::config::Config;
use crate::course::index::{self, Activation, LessonIndex};
use crate::course::{Course, DrillKind};
use crate::event::typed_char;
use crate::keyboard::highlight::HeldModifier;
use crate::session::cards::{CardDrill, SubmitOutcome};
use crate::session::input::{Keystroke, KeystrokeOutcome};
use crate::session::stream::StreamDrill;
use crate::store::KeyValueStore;
use crate::ui::text_area::{InputResult, TextArea};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Index,
    Drill,
}

pub enum ActiveDrill {
    Cards { drill: CardDrill, editor: TextArea },
    Stream(StreamDrill),
}

impl ActiveDrill {
    pub fn is_finished(&self) -> bool {
        match self {
            ActiveDrill::Cards { drill, .. } => drill.is_finished(),
            ActiveDrill::Stream(drill) => drill.is_finished(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ActiveDrill::Cards { drill, .. } => &drill.title,
            ActiveDrill::Stream(drill) => &drill.title,
        }
    }
}

/// Map a terminal key event onto a drill keystroke. Ctrl and Alt chords
/// count as held modifiers, never as typed characters.
pub fn keystroke_from_event(key: KeyEvent) -> Option<Keystroke> {
    let stroke = match key.code {
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Keystroke::modifier(HeldModifier::Ctrl)
        }
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::ALT) => {
            Keystroke::modifier(HeldModifier::Alt)
        }
        KeyCode::Char(ch) => Keystroke::char(typed_char(&key).unwrap_or(ch)),
        KeyCode::Enter => Keystroke::char('\n'),
        KeyCode::Tab => Keystroke::char('\t'),
        KeyCode::Backspace => Keystroke::backspace(),
        KeyCode::CapsLock => Keystroke::modifier(HeldModifier::CapsLock),
        KeyCode::Modifier(m) => Keystroke::modifier(match m {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => HeldModifier::Shift,
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => HeldModifier::Ctrl,
            ModifierKeyCode::LeftAlt
            | ModifierKeyCode::RightAlt
            | ModifierKeyCode::IsoLevel3Shift => HeldModifier::Alt,
            _ => return None,
        }),
        _ => return None,
    };
    Some(stroke.with_caps_lock(key.state.contains(KeyEventState::CAPS_LOCK)))
}

pub struct App {
    pub screen: AppScreen,
    pub course: Course,
    pub index: LessonIndex,
    pub drill: Option<ActiveDrill>,
    pub store: Box<dyn KeyValueStore>,
    pub theme: Theme,
    pub config: Config,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, course: Course, store: Box<dyn KeyValueStore>, theme: Theme) -> Self {
        let index = LessonIndex::load(&course, store.as_ref());
        Self {
            screen: AppScreen::Index,
            course,
            index,
            drill: None,
            store,
            theme,
            config,
            should_quit: false,
        }
    }

    pub fn shake_duration(&self) -> Duration {
        Duration::from_millis(self.config.shake_ms)
    }

    /// Leave the drill and rebuild the index from stored progress.
    pub fn go_to_index(&mut self) {
        self.drill = None;
        self.index = LessonIndex::load(&self.course, self.store.as_ref());
        self.screen = AppScreen::Index;
    }

    pub fn open_lesson(&mut self, category: usize, lesson: usize) {
        let Some(link) = self.course.link(category, lesson) else {
            return;
        };
        let prefix = link
            .key_prefix()
            .unwrap_or_else(|| index::key_prefix(&link.title));

        let drill = match link.drill {
            DrillKind::Cards => ActiveDrill::Cards {
                drill: CardDrill::open(&link.title, &prefix, link.tasks.clone(), self.store.as_mut()),
                editor: TextArea::new(),
            },
            DrillKind::Stream => ActiveDrill::Stream(StreamDrill::open(
                &link.title,
                &prefix,
                link.lessons.clone(),
                self.store.as_ref(),
            )),
        };
        self.drill = Some(drill);
        self.screen = AppScreen::Drill;
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.screen {
            AppScreen::Index => self.handle_index_key(key),
            AppScreen::Drill => self.handle_drill_key(key, now),
        }
    }

    fn handle_index_key(&mut self, key: KeyEvent) {
        let activation = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.index.focus_prev();
                return;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.index.focus_next();
                return;
            }
            KeyCode::Enter => self.index.activate(),
            KeyCode::Char(' ') => self.index.activate_header(),
            _ => return,
        };
        if let Activation::OpenLesson(c, l) = activation {
            self.open_lesson(c, l);
        }
    }

    fn handle_drill_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(drill) = self.drill.as_mut() else {
            self.go_to_index();
            return;
        };

        if drill.is_finished() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.go_to_index();
            }
            return;
        }

        match drill {
            ActiveDrill::Cards { drill, editor } => match editor.handle(key) {
                InputResult::Cancel => self.go_to_index(),
                InputResult::Changed => drill.set_input(editor.value()),
                InputResult::Submit => {
                    let outcome = drill.submit(self.store.as_mut());
                    if outcome != SubmitOutcome::Rejected {
                        editor.clear();
                    }
                }
                InputResult::Continue => {}
            },
            ActiveDrill::Stream(drill) => {
                if key.code == KeyCode::Esc {
                    self.go_to_index();
                    return;
                }
                if let Some(keystroke) = keystroke_from_event(key) {
                    let outcome = drill.handle(keystroke, now, self.store.as_mut());
                    if let KeystrokeOutcome::CourseComplete(_) = outcome {
                        log::info!("{} finished every lesson", drill.prefix());
                    }
                }
            }
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let shake = self.shake_duration();
        if let Some(ActiveDrill::Stream(drill)) = self.drill.as_mut() {
            drill.tick(now, shake);
        }
    }

    /// Key hints for the footer of the current screen.
    pub fn footer_hint(&self) -> String {
        let hint = match (self.screen, self.drill.as_ref()) {
            (AppScreen::Drill, Some(drill)) if drill.is_finished() => t!("completion.next_topic"),
            (AppScreen::Drill, Some(ActiveDrill::Cards { .. })) => t!("cards.hint"),
            (AppScreen::Drill, Some(ActiveDrill::Stream(_))) => t!("stream.hint"),
            _ => t!("index.hint"),
        };
        hint.into_owned()
    }

    /// Header text after the title: the screen name on the index, the
    /// lesson and task position in a stream drill.
    pub fn header_info(&self) -> String {
        match self.drill.as_ref() {
            Some(ActiveDrill::Stream(drill)) if self.screen == AppScreen::Drill => {
                let state = &drill.session.state;
                format!(
                    " {} | {}",
                    t!(
                        "stream.lesson",
                        lesson = state.lesson_index + 1,
                        lessons = drill.lessons().len()
                    ),
                    t!(
                        "stream.task",
                        task = state.task_index + 1,
                        tasks = drill.current_lesson().map_or(0, |l| l.tasks.len())
                    ),
                )
            }
            Some(_) if self.screen == AppScreen::Drill => String::new(),
            _ => format!(" {}", t!("index.title")),
        }
    }

    pub fn stream_drill(&self) -> Option<&StreamDrill> {
        match self.drill.as_ref()? {
            ActiveDrill::Stream(drill) => Some(drill),
            ActiveDrill::Cards { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, keys};

    const COURSE: &str = r#"
title = "App test"
tasks_per_lesson = 1

[[categories]]
title = "Markup"
[[categories.lessons]]
title = "Paragraphs"
href = "html/paragraphs.html"
tasks = [{ instruction = "Type it", code_to_type = "<p>x</p>" }]

[[categories]]
title = "Keys"
[[categories.lessons]]
title = "Home"
href = "typing/home.html"
drill = "stream"
[[categories.lessons.lessons]]
tasks = [{ instruction = "a", code_to_type = "ab" }]
"#;

    fn app() -> App {
        App::new(
            Config::default(),
            Course::from_toml(COURSE).unwrap(),
            Box::new(MemoryStore::new()),
            Theme::default(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_card_lesson_round_trip_marks_index() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Drill);

        type_text(&mut app, "<P>x</P>");
        app.handle_key(
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(app.drill.as_ref().unwrap().is_finished());
        assert!(app.store.get_flag(&keys::task_done("paragraphs", 0)));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Index);
        assert!(app.index.categories[0].complete);
        assert_eq!(app.index.expanded_category(), Some(1));
    }

    #[test]
    fn test_stream_lesson_counts_keys() {
        let mut app = app();
        app.open_lesson(1, 0);
        type_text(&mut app, "xa");
        assert_eq!(app.header_info(), " Lesson 1 of 1 | Task 1 of 1");
        let drill = app.stream_drill().unwrap();
        assert_eq!(drill.session.state.char_index, 1);
        assert_eq!(drill.session.state.errors, 1);

        press(&mut app, KeyCode::Char('b'));
        assert!(app.drill.as_ref().unwrap().is_finished());
        assert!(app.store.get_flag(&keys::task_done("home", 0)));
    }

    #[test]
    fn test_escape_leaves_drill_and_quits_from_index() {
        let mut app = app();
        app.open_lesson(1, 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Index);
        assert_eq!(app.header_info(), " Lessons");
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_keystroke_mapping() {
        let ev = |code, mods| KeyEvent::new(code, mods);
        assert_eq!(
            keystroke_from_event(ev(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Keystroke::char('\n'))
        );
        assert_eq!(
            keystroke_from_event(ev(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Keystroke::char('\t'))
        );
        assert_eq!(
            keystroke_from_event(ev(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Keystroke::modifier(HeldModifier::Ctrl))
        );
        assert_eq!(
            keystroke_from_event(ev(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Keystroke::char('A'))
        );
        assert_eq!(
            keystroke_from_event(ev(
                KeyCode::Modifier(ModifierKeyCode::LeftShift),
                KeyModifiers::SHIFT
            )),
            Some(Keystroke::modifier(HeldModifier::Shift))
        );
        assert_eq!(keystroke_from_event(ev(KeyCode::F(1), KeyModifiers::NONE)), None);

        let mut caps = ev(KeyCode::Char('A'), KeyModifiers::NONE);
        caps.state = KeyEventState::CAPS_LOCK;
        assert!(keystroke_from_event(caps).unwrap().caps_lock);
    }

    #[test]
    fn test_stream_accepts_base_key_reports() {
        use crossterm::event::KeyEventKind;

        let course = Course::from_toml(
            r#"
title = "Kitty"
[[categories]]
title = "Keys"
[[categories.lessons]]
title = "Shifted"
href = "typing/shifted.html"
drill = "stream"
[[categories.lessons.lessons]]
tasks = [{ instruction = "shift", code_to_type = "!A<" }]
"#,
        )
        .unwrap();
        let mut app = App::new(
            Config::default(),
            course,
            Box::new(MemoryStore::new()),
            Theme::default(),
        );
        app.open_lesson(0, 0);

        let kitty = |ch, modifiers, state| {
            KeyEvent::new_with_kind_and_state(KeyCode::Char(ch), modifiers, KeyEventKind::Press, state)
        };
        let now = Instant::now();
        app.handle_key(kitty('1', KeyModifiers::SHIFT, KeyEventState::NONE), now);
        app.handle_key(kitty('a', KeyModifiers::NONE, KeyEventState::CAPS_LOCK), now);
        let state = &app.stream_drill().unwrap().session.state;
        assert_eq!((state.char_index, state.errors), (2, 0));

        app.handle_key(kitty(',', KeyModifiers::SHIFT, KeyEventState::NONE), now);
        assert!(app.drill.as_ref().unwrap().is_finished());
    }
}
