use crossterm::event::{
    Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::Frame;

use light_control::control::Led;

pub const TITLE: &str = "Task 5.1 Traffic LED Selector";

const AMBER: Color = Color::Rgb(255, 176, 0);

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Widget {
    Radio(Led),
    Cycle,
    Exit,
}

/// Focus order, top to bottom
pub const WIDGETS: [Widget; 6] = [
    Widget::Radio(Led::Green),
    Widget::Radio(Led::Amber),
    Widget::Radio(Led::Red),
    Widget::Radio(Led::Off),
    Widget::Cycle,
    Widget::Exit,
];

impl Widget {
    /// The radio group and the cycle button are disabled while cycling
    pub fn is_enabled(self, cycling: bool) -> bool {
        match self {
            Widget::Exit => true,
            _ => !cycling,
        }
    }

    fn command(self) -> Command {
        match self {
            Widget::Radio(led) => Command::Select(led),
            Widget::Cycle => Command::Cycle,
            Widget::Exit => Command::Exit,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub enum Command {
    Select(Led),
    Cycle,
    Exit,
}

/// What the window shows
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
pub struct View {
    pub selected: Led,
    pub cycling: bool,
    /// green, amber, red
    pub lit: (bool, bool, bool),
}

/// Focus and hit areas of the traffic light window
pub struct Window {
    focus: usize,
    hitboxes: Vec<(Rect, Widget)>,
}

impl Window {
    pub fn new() -> Self {
        Window {
            // the checked radio, like a freshly opened dialog
            focus: 3,
            hitboxes: vec![],
        }
    }

    pub fn focused(&self) -> Widget {
        WIDGETS[self.focus]
    }

    pub fn handle_event(&mut self, event: CEvent, cycling: bool) -> Option<Command> {
        match event {
            CEvent::Key(key) => self.handle_key(key, cycling),
            CEvent::Mouse(mouse) => self.handle_mouse(mouse, cycling),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, cycling: bool) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Exit);
        }
        match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.move_focus(WIDGETS.len() - 1, cycling);
                None
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_focus(1, cycling);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(self.focused(), cycling),
            KeyCode::Esc | KeyCode::Char('q') => Some(Command::Exit),
            KeyCode::Char('g') => self.activate(Widget::Radio(Led::Green), cycling),
            KeyCode::Char('a') => self.activate(Widget::Radio(Led::Amber), cycling),
            KeyCode::Char('r') => self.activate(Widget::Radio(Led::Red), cycling),
            KeyCode::Char('o') => self.activate(Widget::Radio(Led::Off), cycling),
            KeyCode::Char('c') => self.activate(Widget::Cycle, cycling),
            _ => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, cycling: bool) -> Option<Command> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let hit = self
            .hitboxes
            .iter()
            .find(|(area, _)| contains(*area, mouse.column, mouse.row))
            .map(|(_, widget)| *widget)?;
        self.activate(hit, cycling)
    }

    /// Focuses the widget and returns its command, nothing if it is disabled
    fn activate(&mut self, widget: Widget, cycling: bool) -> Option<Command> {
        if !widget.is_enabled(cycling) {
            return None;
        }
        if let Some(index) = WIDGETS.iter().position(|it| *it == widget) {
            self.focus = index;
        }
        Some(widget.command())
    }

    /// Steps forward by `step` (modulo the widget count) until an enabled widget is found
    fn move_focus(&mut self, step: usize, cycling: bool) {
        let mut next = self.focus;
        for _ in 0..WIDGETS.len() {
            next = (next + step) % WIDGETS.len();
            if WIDGETS[next].is_enabled(cycling) {
                self.focus = next;
                return;
            }
        }
    }

    pub fn draw<B: Backend>(&mut self, frame: &mut Frame<B>, view: View) {
        self.hitboxes.clear();

        let vertical_layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Length(6),
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(frame.size());

        let group = Block::default()
            .title("Traffic Lights")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(self.enabled_style(!view.cycling));
        let radios = group.inner(vertical_layout[0]);
        frame.render_widget(group, vertical_layout[0]);

        for (row, led) in Led::ALL.iter().enumerate() {
            if row as u16 >= radios.height {
                break;
            }
            let area = Rect::new(radios.x, radios.y + row as u16, radios.width, 1);
            let widget = Widget::Radio(*led);
            let mark = if view.selected == *led { "(•)" } else { "( )" };
            let radio = Paragraph::new(Spans::from(Span::styled(
                format!("{} {}", mark, led.label()),
                self.widget_style(widget, view.cycling),
            )));
            frame.render_widget(radio, area);
            self.hitboxes.push((area, widget));
        }

        let cycle_label = if view.cycling { "Cycling..." } else { "Cycle" };
        self.draw_button(frame, vertical_layout[1], Widget::Cycle, cycle_label, view.cycling);
        self.draw_button(frame, vertical_layout[2], Widget::Exit, "Exit", view.cycling);

        let (green, amber, red) = view.lit;
        let lamps = Paragraph::new(Spans::from(vec![
            lamp("G", green, Color::Green),
            Span::raw(" "),
            lamp("A", amber, AMBER),
            Span::raw(" "),
            lamp("R", red, Color::Red),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Plain));
        frame.render_widget(lamps, vertical_layout[3]);
    }

    fn draw_button<B: Backend>(
        &mut self,
        frame: &mut Frame<B>,
        area: Rect,
        widget: Widget,
        label: &str,
        cycling: bool,
    ) {
        let button = Paragraph::new(Spans::from(Span::styled(
            label.to_string(),
            self.widget_style(widget, cycling),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(self.enabled_style(widget.is_enabled(cycling))),
        );
        frame.render_widget(button, area);
        self.hitboxes.push((area, widget));
    }

    fn widget_style(&self, widget: Widget, cycling: bool) -> Style {
        let style = self.enabled_style(widget.is_enabled(cycling));
        if widget.is_enabled(cycling) && self.focused() == widget {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    fn enabled_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }
}

fn lamp(name: &'static str, lit: bool, color: Color) -> Span<'static> {
    let style = if lit {
        Style::default().bg(color).fg(Color::Black)
    } else {
        Style::default().bg(Color::Black).fg(Color::DarkGray)
    };
    Span::styled(format!("  {}  ", name), style)
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}
