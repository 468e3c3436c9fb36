use ratatui::layout::{Constraint, Flex, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥90 cols: drill + stats sidebar, keyboard
    Medium, // 62-89 cols: stats in the header, keyboard
    Narrow, // <62 cols: stats in the header only
}

/// Columns the full keyboard diagram needs inside its border.
pub const KEYBOARD_WIDTH: u16 = 60;
pub const KEYBOARD_HEIGHT: u16 = 7;
const SIDEBAR_WIDTH: u16 = 26;

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 90 {
            LayoutTier::Wide
        } else if area.width >= KEYBOARD_WIDTH + 2 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_keyboard(&self, height: u16) -> bool {
        height >= 24 && *self != LayoutTier::Narrow
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(area);

        let (main, sidebar) = if tier.show_sidebar() {
            let [main, sidebar] = Layout::horizontal([
                Constraint::Min(KEYBOARD_WIDTH + 2),
                Constraint::Length(SIDEBAR_WIDTH),
            ])
            .areas(body);
            (main, Some(sidebar))
        } else {
            (body, None)
        };

        Self {
            header,
            main,
            sidebar,
            footer,
            tier,
        }
    }
}

/// Dialog-sized rectangle centered in `area`, at least 40x8 when `area`
/// has room for it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let scale = |len: u16, percent: u16, min: u16| {
        let wanted = u32::from(len) * u32::from(percent.min(100)) / 100;
        (wanted as u16).max(min).min(len)
    };
    let width = scale(area.width, percent_x, 40);
    let height = scale(area.height, percent_y, 8);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_by_width() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 70, 40)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 50, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn test_sidebar_only_when_wide() {
        assert!(AppLayout::new(Rect::new(0, 0, 120, 40)).sidebar.is_some());
        assert!(AppLayout::new(Rect::new(0, 0, 80, 40)).sidebar.is_none());
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 30, 6);
        let rect = centered_rect(50, 50, area);
        assert!(rect.width <= 30 && rect.height <= 6);

        let rect = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }
}
