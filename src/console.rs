//! Plain-text board and input handling for the terminal client.

use strictly_sim::{Edge, EdgeError, Phase, Point, Session, Side};

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Leave the game.
    Quit,
    /// Submit a move; `None` when the line was blank.
    Move(Option<Edge>),
    /// Text that is not an edge.
    Invalid(EdgeError),
}

/// Reads a line typed at the move prompt.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }
    if line.is_empty() {
        return Input::Move(None);
    }
    match line.parse::<Edge>() {
        Ok(edge) => Input::Move(Some(edge)),
        Err(err) => Input::Invalid(err),
    }
}

fn mark(owner: Option<Side>) -> char {
    match owner {
        Some(Side::Player) => 'P',
        Some(Side::Opponent) => 'O',
        None => '.',
    }
}

/// Renders the session as an adjacency grid plus the open moves.
///
/// `P` marks your edges, `O` the opponent's, `.` unclaimed ones.
pub fn render(session: &Session) -> String {
    let header: String = Point::all().map(|point| format!(" {}", point)).collect();
    let mut out = format!("   {}\n", header);

    for row in Point::all() {
        let cells: String = Point::all()
            .map(|col| match Edge::new(row, col) {
                Ok(edge) => format!(" {}", mark(session.owner(edge))),
                Err(_) => "  ".to_string(),
            })
            .collect();
        out.push_str(&format!(" {} {}\n", row, cells));
    }

    out.push_str(&format!("status: {}\n", status_line(session)));
    if session.phase().can_submit() {
        let moves: Vec<String> = session.available().iter().map(Edge::to_string).collect();
        out.push_str(&format!("open moves: {}\n", moves.join(" ")));
    }
    out
}

fn status_line(session: &Session) -> String {
    match (session.phase(), session.outcome()) {
        (Phase::Ended, Some(outcome)) => match outcome.winner() {
            Side::Player => "you won".to_string(),
            Side::Opponent => "the AI won".to_string(),
        },
        (phase, _) => phase.to_string(),
    }
}
