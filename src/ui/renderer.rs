/// Presentation layer: draws the character panel to the terminal.
///
/// Panel content is built as plain lines first (`build_panel`), then
/// diffed against the previously drawn lines so only changed rows are
/// redrawn. All terminal commands are batched with `queue!` and flushed
/// once per frame.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::domain::character::Character;
use crate::domain::scorer::ComboStatus;
use crate::domain::tier;

const PANEL_WIDTH: usize = 60;
const EXP_BAR_WIDTH: usize = 20;

pub struct Renderer {
    last_lines: Vec<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { last_lines: vec![] }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(io::stdout(), Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Draw the character panel, redrawing only changed rows.
    pub fn render(&mut self, character: &Character, combo: &ComboStatus, message: &str) -> io::Result<()> {
        let lines = build_panel(character, combo, message);
        self.draw_lines(&lines)
    }

    /// Draw a full-screen animation frame (always a full redraw).
    pub fn render_frame(&mut self, content: &str) -> io::Result<()> {
        self.last_lines.clear();
        let mut out = io::stdout();
        queue!(out, Clear(ClearType::All))?;
        for (row, line) in content.lines().enumerate() {
            queue!(out, MoveTo(0, row as u16), Print(line))?;
        }
        out.flush()
    }

    /// Invalidate the diff buffer so the next render redraws everything.
    pub fn invalidate(&mut self) {
        self.last_lines.clear();
    }

    fn draw_lines(&mut self, lines: &[String]) -> io::Result<()> {
        let mut out = io::stdout();
        if self.last_lines.is_empty() {
            queue!(out, Clear(ClearType::All))?;
        }
        for (row, line) in lines.iter().enumerate() {
            if self.last_lines.get(row) != Some(line) {
                queue!(
                    out,
                    MoveTo(0, row as u16),
                    Clear(ClearType::CurrentLine),
                    Print(line),
                )?;
            }
        }
        // Clear rows left over from a taller previous panel
        for row in lines.len()..self.last_lines.len() {
            queue!(out, MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
        }
        out.flush()?;
        self.last_lines = lines.to_vec();
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Panel content (pure)
// ══════════════════════════════════════════════════════════════

pub fn build_panel(c: &Character, combo: &ComboStatus, message: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(16);

    let t = tier::tier_for(c.level());
    lines.push("═".repeat(PANEL_WIDTH));
    lines.push(center(&format!("{} Key Quest  Lv.{} {}", t.emoji, c.level(), c.title())));
    lines.push(format!("{}   {}", hp_line(c), mp_line(c)));
    lines.push(String::new());

    if let Some(monster) = c.monster() {
        // Battle scene: monster left, character right
        lines.push(format!(
            "   {} {}  Lv.{}{}vs{}{} (You)",
            monster.emoji(), monster.name, monster.level,
            " ".repeat(10), " ".repeat(8 + c.pos_x() as usize), c.emoji(),
        ));
        lines.push(format!(
            "   {} HP: {}/{}",
            monster.name, monster.hp, monster.max_hp,
        ));
        lines.push(center("[Tab] attack!"));
    } else {
        // Peaceful scene: character centered with level aura
        let aura = tier::aura_for(c.level());
        let figure = if aura.is_empty() {
            c.emoji().to_string()
        } else {
            format!("{} {} {}", aura, c.emoji(), aura)
        };
        lines.push(center(&figure));
        lines.push(center(c.weapon()));
        lines.push(String::new());
    }

    lines.push(String::new());
    lines.push(format!("{}   {}", exp_line(c), combo_line(combo)));
    lines.push("═".repeat(PANEL_WIDTH));

    if !message.is_empty() {
        lines.push(message.to_string());
    }

    lines
}

fn hp_line(c: &Character) -> String {
    let hearts = if c.max_hp() == 0 { 0 } else {
        ((c.hp() as f64 / c.max_hp() as f64) * 5.0).ceil() as usize
    };
    format!("{} HP: {}/{}", "❤️".repeat(hearts.max(1).min(5)), c.hp(), c.max_hp())
}

fn mp_line(c: &Character) -> String {
    format!("⚡ MP: {}/{}", c.mp(), c.max_mp())
}

fn exp_line(c: &Character) -> String {
    match c.exp_to_next() {
        Some(next) => {
            let ratio = (c.experience() as f64 / next as f64).min(1.0);
            let filled = (EXP_BAR_WIDTH as f64 * ratio) as usize;
            format!(
                "EXP: {}{} {}/{}",
                "■".repeat(filled),
                "□".repeat(EXP_BAR_WIDTH - filled),
                c.experience(), next,
            )
        }
        None => format!("EXP: {} {}/∞", "■".repeat(EXP_BAR_WIDTH), c.experience()),
    }
}

fn combo_line(combo: &ComboStatus) -> String {
    if !combo.active {
        return format!("COMBO x{}", combo.level);
    }
    let bolts = "⚡".repeat(combo.level.min(5) as usize);
    format!(
        "{} COMBO x{} ({:.1}x, {}s)",
        bolts, combo.level, combo.multiplier,
        combo.remaining_ms / 1000,
    )
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= PANEL_WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((PANEL_WIDTH - len) / 2), text)
}
