//! Stage-to-terminal rendering
//!
//! Maps engine stage values onto terminal cells. One stage unit is roughly
//! a quarter cell horizontally and half a cell vertically, which keeps the
//! search-bar morph on screen in an 80-column terminal.

use anty_core::{AnimationController, AnimationState, ElementId, EyeShape, PropertyId, Stage};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::particles::ParticleField;

/// Horizontal cells per stage unit.
const CELLS_PER_UNIT_X: f32 = 0.25;
/// Vertical cells per stage unit.
const CELLS_PER_UNIT_Y: f32 = 0.5;
/// Shadow width at rest, cells.
const SHADOW_BASE_WIDTH: f32 = 7.0;

/// Glyph for one eye. Brackets are handed out by side.
pub fn eye_glyph(shape: EyeShape, left: bool) -> char {
    match shape {
        EyeShape::Open => 'o',
        EyeShape::Blink | EyeShape::Sleepy => '-',
        EyeShape::Happy => '^',
        EyeShape::Excited => '*',
        EyeShape::Shocked => 'O',
        EyeShape::Curious => '?',
        EyeShape::Love => '3',
        EyeShape::Off => ' ',
        EyeShape::Bracket => {
            if left {
                '['
            } else {
                ']'
            }
        }
    }
}

/// The character's face as three text rows, eyes taken from the stage.
pub fn body_lines(stage: &Stage) -> Vec<String> {
    let left = eye_glyph(stage.shape(ElementId::EyeLeft), true);
    let right = eye_glyph(stage.shape(ElementId::EyeRight), false);
    vec![
        " .-----. ".to_string(),
        format!("(  {left} {right}  )"),
        " '-----' ".to_string(),
    ]
}

/// The shadow row: width follows scale, shading follows opacity.
pub fn shadow_line(scale: f32, opacity: f32) -> String {
    let width = (SHADOW_BASE_WIDTH * scale).round().max(1.0) as usize;
    let glyph = if opacity >= 0.75 {
        '#'
    } else if opacity >= 0.45 {
        '='
    } else {
        '-'
    };
    std::iter::repeat(glyph).take(width).collect()
}

fn opacity_style(opacity: f32) -> Option<Style> {
    if opacity < 0.15 {
        None
    } else if opacity < 0.6 {
        Some(Style::default().add_modifier(Modifier::DIM))
    } else {
        Some(Style::default())
    }
}

/// Draw one full frame: character (or search bar), shadow, glow, particles,
/// the key legend, and optionally the debug overlay.
pub fn draw(
    frame: &mut Frame,
    controller: &AnimationController,
    particles: &ParticleField,
    debug: bool,
    status: Option<&str>,
) {
    let area = frame.area();
    let stage = controller.stage();

    let center_x = area.x + area.width / 2;
    let baseline = area.y + area.height.saturating_sub(6);

    draw_search_field(frame, controller, center_x, baseline);
    draw_character(frame, stage, center_x, baseline);
    draw_shadow(frame, stage, center_x, baseline);
    draw_particles(frame, particles, center_x, baseline);
    draw_footer(frame, area, controller, status);
    if debug {
        draw_debug(frame, area, controller);
    }
}

fn cell_x(center_x: u16, stage_x: f32) -> i32 {
    i32::from(center_x) + (stage_x * CELLS_PER_UNIT_X).round() as i32
}

fn cell_y(baseline: u16, stage_y: f32) -> i32 {
    // Stage y is negative going up; screen y grows downward.
    i32::from(baseline) + (stage_y * CELLS_PER_UNIT_Y).round() as i32
}

fn put_line(frame: &mut Frame, x: i32, y: i32, text: &str, style: Style) {
    let area = frame.area();
    if y < i32::from(area.y) || y >= i32::from(area.y + area.height) || x < 0 {
        return;
    }
    let width = text.len().min(usize::from(area.width.saturating_sub(x as u16)));
    if width == 0 || x as u16 >= area.x + area.width {
        return;
    }
    let rect = Rect::new(x as u16, y as u16, width as u16, 1);
    frame.render_widget(Paragraph::new(text).style(style), rect);
}

fn draw_character(frame: &mut Frame, stage: &Stage, center_x: u16, baseline: u16) {
    let opacity = stage.get(ElementId::Body, PropertyId::Opacity);
    let Some(style) = opacity_style(opacity) else {
        return;
    };
    let style = style.fg(Color::Cyan);

    let y = stage.get(ElementId::Body, PropertyId::Y);
    let lines = body_lines(stage);
    let top = cell_y(baseline, y) - lines.len() as i32 + 1;
    let left = cell_x(center_x, stage.get(ElementId::Body, PropertyId::X))
        - (lines[0].len() as i32) / 2;
    for (row, line) in lines.iter().enumerate() {
        put_line(frame, left, top + row as i32, line, style);
    }

    // Glow halo above the body when it is bright enough.
    let glow = stage.get(ElementId::Glow, PropertyId::Opacity);
    if glow >= 0.45 {
        let halo = Style::default().fg(Color::LightYellow).add_modifier(Modifier::DIM);
        put_line(frame, left, top - 1, " . . . . ", halo);
    }
}

fn draw_shadow(frame: &mut Frame, stage: &Stage, center_x: u16, baseline: u16) {
    let opacity = stage.get(ElementId::Shadow, PropertyId::Opacity);
    if opacity_style(opacity).is_none() {
        return;
    }
    let line = shadow_line(stage.get(ElementId::Shadow, PropertyId::Scale), opacity);
    let left = i32::from(center_x) - (line.len() as i32) / 2;
    put_line(
        frame,
        left,
        i32::from(baseline) + 2,
        &line,
        Style::default().fg(Color::DarkGray),
    );
}

fn draw_search_field(
    frame: &mut Frame,
    controller: &AnimationController,
    center_x: u16,
    baseline: u16,
) {
    let stage = controller.stage();
    let opacity = stage.get(ElementId::SearchField, PropertyId::Opacity);
    let Some(style) = opacity_style(opacity) else {
        return;
    };

    let left_x = cell_x(center_x, stage.get(ElementId::BracketLeft, PropertyId::X));
    let right_x = cell_x(center_x, stage.get(ElementId::BracketRight, PropertyId::X));
    let y = cell_y(baseline, stage.get(ElementId::BracketLeft, PropertyId::Y));
    if right_x <= left_x + 2 || y < 1 {
        return;
    }

    let width = (right_x - left_x + 1) as u16;
    let rect = Rect::new(left_x.max(0) as u16, (y - 1).max(0) as u16, width, 3);
    let block = Block::default()
        .borders(Borders::ALL)
        .style(style.fg(Color::White));
    let placeholder = Paragraph::new(Line::from(Span::styled(
        controller.config().placeholder.clone(),
        Style::default().add_modifier(Modifier::DIM),
    )))
    .block(block);
    frame.render_widget(placeholder, rect);
}

fn draw_particles(frame: &mut Frame, particles: &ParticleField, center_x: u16, baseline: u16) {
    for particle in particles.iter() {
        let style = if particle.fade() > 0.6 {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let x = cell_x(center_x, particle.x);
        let y = cell_y(baseline, particle.y);
        put_line(frame, x, y, &particle.glyph.to_string(), style);
    }
}

fn draw_footer(
    frame: &mut Frame,
    area: Rect,
    controller: &AnimationController,
    status: Option<&str>,
) {
    let state = controller.state();
    let mut spans = vec![
        Span::styled(
            format!(" {state} "),
            Style::default().fg(state_color(state)).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| h/e/k/c/z/l emotions  s search  p power  i idle  r reset  d debug  q quit"),
    ];
    if let Some(status) = status {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(Color::Green),
        ));
    }
    let rect = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    frame.render_widget(Paragraph::new(Line::from(spans)), rect);
}

fn state_color(state: AnimationState) -> Color {
    match state {
        AnimationState::Off => Color::DarkGray,
        AnimationState::Idle => Color::Cyan,
        AnimationState::Transition | AnimationState::Morph => Color::Yellow,
        AnimationState::Interaction => Color::White,
        AnimationState::Emotion => Color::Magenta,
    }
}

fn draw_debug(frame: &mut Frame, area: Rect, controller: &AnimationController) {
    let snapshot = controller.debug_snapshot();
    let mut lines = vec![
        Line::from(format!("state: {}", snapshot.machine.current_state)),
        Line::from(format!("prev:  {:?}", snapshot.machine.previous_state)),
        Line::from(format!("active: {}", snapshot.active_timelines.join(", "))),
        Line::from(format!("search: {}", snapshot.search_mode)),
        Line::from(format!("conflicts: {}", snapshot.conflict_count)),
    ];
    for entry in snapshot.machine.recent_history.iter().take(5) {
        lines.push(Line::from(format!("  {entry}")));
    }

    let height = (lines.len() as u16 + 2).min(area.height);
    let width = 44.min(area.width);
    let rect = Rect::new(area.x + area.width - width, area.y, width, height);
    let block = Block::default().borders(Borders::ALL).title("engine");
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::Gray))
            .block(block),
        rect,
    );
}
