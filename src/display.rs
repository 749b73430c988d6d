/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable snapshot of the
/// session. Field coordinates are scaled onto the terminal grid; no game
/// logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use last_war::compute::Snapshot;
use last_war::entities::{EnemyKind, GameStatus, PowerUpKind};
use last_war::events::GameOverReason;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_POWER: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_SHIELDED: Color = Color::DarkGrey;
const C_FLASH: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_DANGER: Color = Color::DarkRed;
const C_HINT: Color = Color::DarkGrey;

/// Maps field units onto terminal cells inside the border.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub field_width: f64,
    pub field_height: f64,
}

impl Viewport {
    /// Play area spans rows 2 ..= rows-3 and columns 1 ..= cols-2.
    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let inner_w = self.cols.saturating_sub(2) as f64;
        let inner_h = self.rows.saturating_sub(4) as f64;
        if x < 0.0 || y < 0.0 || x >= self.field_width || y >= self.field_height {
            return None;
        }
        let col = 1 + (x / self.field_width * inner_w) as u16;
        let row = 2 + (y / self.field_height * inner_h) as u16;
        Some((col, row))
    }

    fn row_of(&self, y: f64) -> u16 {
        let inner_h = self.rows.saturating_sub(4) as f64;
        2 + (y.clamp(0.0, self.field_height - 1.0) / self.field_height * inner_h) as u16
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &Viewport,
    snap: &Snapshot<'_>,
    high_score: u32,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    if let Some(line) = snap.danger_line {
        draw_danger_line(out, view, line)?;
    }
    draw_hud(out, view, snap, high_score)?;

    for enemy in snap.enemies {
        let color = if enemy.is_flashing(snap.clock) {
            C_FLASH
        } else {
            enemy_color(enemy.kind)
        };
        let (cx, cy) = (enemy.rect().center_x(), enemy.rect().center_y());
        draw_glyph(out, view, cx, cy, enemy_glyph(enemy.kind), color)?;
    }
    for power_up in snap.power_ups {
        let (glyph, color) = power_up_glyph(power_up.kind);
        let rect = power_up.rect();
        draw_glyph(out, view, rect.center_x(), rect.center_y(), glyph, color)?;
        if let Some((col, row)) = view.cell(rect.center_x(), rect.center_y()) {
            let label = power_up.value_label();
            if col as usize + 1 + label.len() < view.cols as usize {
                out.queue(cursor::MoveTo(col + 1, row))?;
                out.queue(Print(label))?;
            }
        }
    }
    for bullet in snap.player_bullets {
        draw_glyph(out, view, bullet.x, bullet.y, "║", C_BULLET_PLAYER)?;
    }
    for bullet in snap.enemy_bullets {
        draw_glyph(out, view, bullet.x, bullet.y, "↓", enemy_color(bullet.owner))?;
    }

    let player = snap.player;
    let player_color = if player.is_invulnerable() {
        C_PLAYER_SHIELDED
    } else {
        C_PLAYER
    };
    let rect = player.rect();
    draw_glyph(out, view, rect.center_x(), rect.center_y(), "▲", player_color)?;

    draw_controls_hint(out, view)?;

    match snap.status {
        GameStatus::Paused => {
            draw_banner(out, view, &["── PAUSED ──", "P - Resume"], Color::Yellow)?
        }
        GameStatus::GameOver => draw_game_over(out, view, snap, high_score)?,
        _ => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & danger line ──────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_danger_line<W: Write>(out: &mut W, view: &Viewport, y: f64) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.row_of(y)))?;
    out.queue(style::SetForegroundColor(C_DANGER))?;
    out.queue(Print("╌".repeat(view.cols.saturating_sub(2) as usize)))?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: &Viewport,
    snap: &Snapshot<'_>,
    high_score: u32,
) -> std::io::Result<()> {
    let stats = snap.stats;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>7}  Hi:{:>7}  Lv{:<2} {:>5.1}s",
        stats.score,
        high_score.max(stats.score),
        snap.difficulty.kill_level,
        stats.survival_seconds()
    )))?;

    let player = snap.player;
    let filled = (player.health as usize * 10) / player.max_health.max(1) as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled.min(10)));
    let power = format!(" PW{:<3} x{}", player.power, player.shot_count);
    let right_len = (bar.chars().count() + power.chars().count()) as u16;

    out.queue(cursor::MoveTo(view.cols.saturating_sub(right_len + 1), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&bar))?;
    out.queue(style::SetForegroundColor(C_HUD_POWER))?;
    out.queue(Print(&power))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn enemy_glyph(kind: EnemyKind) -> &'static str {
    match kind {
        EnemyKind::Basic => "▼",
        EnemyKind::Fast => "≈",
        EnemyKind::Tank => "■",
        EnemyKind::Boss => "◎",
    }
}

fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Basic => Color::Red,
        EnemyKind::Fast => Color::DarkYellow,
        EnemyKind::Tank => Color::Magenta,
        EnemyKind::Boss => Color::DarkRed,
    }
}

/// Symbols:
///   ↑ (yellow)  - DamageUp
///   ♥ (magenta) - Health
///   ⁂ (cyan)    - MultiShot
///   ◊ (blue)    - Shield
///   ↓ (grey)    - DamageDown
fn power_up_glyph(kind: PowerUpKind) -> (&'static str, Color) {
    match kind {
        PowerUpKind::DamageUp => ("↑", Color::Yellow),
        PowerUpKind::Health => ("♥", Color::Magenta),
        PowerUpKind::MultiShot => ("⁂", Color::Cyan),
        PowerUpKind::Shield => ("◊", Color::Blue),
        PowerUpKind::DamageDown => ("↓", Color::DarkGrey),
    }
}

fn draw_glyph<W: Write>(
    out: &mut W,
    view: &Viewport,
    x: f64,
    y: f64,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(x, y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   P : Pause   M : Menu   Q : Quit   (shoot items, don't touch them)",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    view: &Viewport,
    lines: &[&str],
    color: Color,
) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*line))?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &Viewport,
    snap: &Snapshot<'_>,
    high_score: u32,
) -> std::io::Result<()> {
    let stats = snap.stats;
    let cause = match snap.game_over_reason {
        Some(GameOverReason::DangerZone) => "The line was breached",
        Some(GameOverReason::HealthDepleted) | None => "Your ship was destroyed",
    };
    let score_line = format!("Final Score: {:>7}", stats.score);
    let best_line = if stats.score > high_score {
        format!("★ NEW BEST: {:>7} ★", stats.score)
    } else {
        format!("Best Score:  {:>7}", high_score)
    };
    let tally = format!(
        "Kills {}  Items {}  {:.1}s",
        stats.kills,
        stats.power_ups_collected,
        stats.survival_seconds()
    );

    draw_banner(
        out,
        view,
        &[
            "╔════════════════════╗",
            "║    GAME  OVER      ║",
            "╚════════════════════╝",
            cause,
            &score_line,
            &best_line,
            &tally,
            "R - Play Again  M - Menu  Q - Quit",
        ],
        Color::Red,
    )
}
