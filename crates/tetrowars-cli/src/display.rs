use std::io::{self, Write};

use tetrowars_engine::{BOARD_HEIGHT, BOARD_WIDTH, GameView, Notice, Observer, Piece, PlayerId};

const GAP: &str = "     ";
const FOG: char = '?';

/// Renders both boards side by side as plain text.
#[derive(Debug)]
pub struct TextDisplay<W> {
    out: W,
    failed: bool,
}

impl<W> TextDisplay<W>
where
    W: Write,
{
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn write_with(&mut self, f: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.failed {
            return;
        }
        if let Err(err) = f(&mut self.out).and_then(|()| self.out.flush()) {
            eprintln!("Failed to write display: {err}");
            self.failed = true;
        }
    }
}

fn write_pair(out: &mut impl Write, left: &str, right: &str) -> io::Result<()> {
    writeln!(out, "{left:<width$}{GAP}{right}", width = BOARD_WIDTH)
}

fn render_board(out: &mut impl Write, view: &GameView<'_>) -> io::Result<()> {
    let [one, two] = PlayerId::ALL;
    write_pair(
        out,
        &format!("Level:{:>5}", view.level_of(one)),
        &format!("Level:{:>5}", view.level_of(two)),
    )?;
    write_pair(
        out,
        &format!("Score:{:>5}", view.score_of(one)),
        &format!("Score:{:>5}", view.score_of(two)),
    )?;
    writeln!(out, "Hi Score:{:>2}", view.high_score())?;

    let rule = "-".repeat(BOARD_WIDTH);
    write_pair(out, &rule, &rule)?;
    for row in 0..BOARD_HEIGHT {
        let line = |player: PlayerId| -> String {
            (0..BOARD_WIDTH)
                .map(|col| {
                    if view.is_cell_fogged(player, row, col) {
                        FOG
                    } else {
                        view.cell_symbol_at(player, row, col)
                    }
                })
                .collect()
        };
        write_pair(out, &line(one), &line(two))?;
    }
    write_pair(out, &rule, &rule)?;

    write_pair(out, "Next:", "Next:")?;
    let left = preview_lines(view.next_piece_of(one));
    let right = preview_lines(view.next_piece_of(two));
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).map_or("", String::as_str);
        let r = right.get(i).map_or("", String::as_str);
        write_pair(out, l, r)?;
    }
    Ok(())
}

/// Draws a piece in its own bounding box, one string per row.
fn preview_lines(piece: Option<&Piece>) -> Vec<String> {
    let Some(piece) = piece else {
        return vec![];
    };
    let cells: Vec<_> = piece.relative_cells().collect();
    let height = cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
    let width = cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
    let mut lines = vec![vec![' '; width]; height];
    for (r, c) in cells {
        lines[r][c] = piece.symbol();
    }
    lines
        .into_iter()
        .map(|line| line.into_iter().collect())
        .collect()
}

impl<W> Observer for TextDisplay<W>
where
    W: Write,
{
    fn notify(&mut self, view: &GameView<'_>) {
        self.write_with(|out| {
            writeln!(out)?;
            render_board(out, view)?;
            writeln!(out, "{} to move.", view.current_player())
        });
    }

    fn notify_win(&mut self, view: &GameView<'_>) {
        self.write_with(|out| {
            writeln!(out)?;
            render_board(out, view)?;
            match view.winner() {
                Some(winner) => writeln!(out, "{} loses. {winner} wins!", winner.opponent()),
                None => Ok(()),
            }
        });
    }

    fn notice(&mut self, notice: &Notice) {
        self.write_with(|out| writeln!(out, "{notice}"));
    }
}
