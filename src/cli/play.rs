//! Line-based terminal front end for a game session.

use std::{
    io::{BufRead, Write},
    time::Instant,
};

use anyhow::Context;

use crate::game::{RoundAdvance, Session, SessionState, scoring::AnswerOutcome};

/// Typed instead of an answer to get a hint
const HINT_COMMAND: &str = "?";

fn mark(correct: bool) -> &'static str {
    if correct { "yes" } else { "no" }
}

/// Reads one line, `None` on end of input
fn read_line(input: &mut impl BufRead) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| "failed to read answer")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Prompts until the player types something other than the hint command
fn prompt_answer(
    session: &mut Session,
    label: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<Option<String>> {
    loop {
        write!(out, "{label} ({HINT_COMMAND} for a hint): ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if line.trim() != HINT_COMMAND {
            return Ok(Some(line));
        }

        match session.request_hint() {
            Some(_) => print_masks(session, out)?,
            None => writeln!(out, "  no hint available")?,
        }
    }
}

fn print_masks(session: &Session, out: &mut impl Write) -> anyhow::Result<()> {
    if let Some(round) = session.current_round() {
        writeln!(out, "  Title:  {}", round.title_hint())?;
        writeln!(out, "  Artist: {}", round.artist_hint())?;
    }
    Ok(())
}

fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn print_outcome(
    session: &Session,
    outcome: &AnswerOutcome,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "  title: {}, artist: {}, +{} points",
        mark(outcome.title_correct),
        mark(outcome.artist_correct),
        outcome.points_awarded
    )?;
    if let Some(track) = session.current_round().and_then(|r| r.track()) {
        writeln!(
            out,
            "  it was \"{}\" by {} ({})",
            track.title(),
            track.artist(),
            format_duration(track.duration_secs())
        )?;
    }
    Ok(())
}

fn print_standings(session: &Session, out: &mut impl Write) -> anyhow::Result<()> {
    let mut players = session.players().iter().collect::<Vec<_>>();
    players.sort_by(|a, b| b.score().cmp(&a.score()));

    writeln!(out, "Final scores:")?;
    for player in players {
        writeln!(out, "  {:<16} {}", player.name(), player.score())?;
    }

    writeln!(out, "Tracks:")?;
    for track in session.rounds().iter().filter_map(|r| r.track()) {
        writeln!(out, "  {} - {}", track.artist(), track.title())?;
    }

    let stats = session.stats();
    writeln!(
        out,
        "{} tracks, {} titles and {} artists found, {} hints used",
        stats.tracks_played, stats.correct_titles, stats.correct_artists, stats.hints_used
    )?;
    Ok(())
}

/// Runs a whole game. Answers slower than the excerpt count as a timeout.
///
/// Returns `false` when the input ended before the game did; the game is then
/// abandoned and nothing is recorded.
pub fn play(
    session: &mut Session,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    writeln!(
        out,
        "{} game, genre '{}', {} rounds",
        session.mode(),
        session.genre(),
        session.total_rounds()
    )?;
    session.start_game();
    let extract = f64::from(session.settings().extract_duration_secs);

    while session.state() == SessionState::InProgress {
        let Some(round_index) = session.current_round_index() else {
            break;
        };
        let player_index = session.current_player_index();
        let player = session.players()[player_index].name().to_string();

        writeln!(
            out,
            "\nRound {}/{}: {player}'s turn, {}s excerpt",
            round_index + 1,
            session.total_rounds(),
            session.settings().extract_duration_secs
        )?;
        print_masks(session, out)?;

        let started = Instant::now();
        let Some(title) = prompt_answer(session, "Title", input, out)? else {
            writeln!(out, "\nGame abandoned")?;
            return Ok(false);
        };
        let Some(artist) = prompt_answer(session, "Artist", input, out)? else {
            writeln!(out, "\nGame abandoned")?;
            return Ok(false);
        };
        let elapsed = started.elapsed().as_secs_f64();

        let outcome = if elapsed > extract {
            writeln!(out, "  time is up")?;
            session.submit_answer("", "", extract, player_index)
        } else {
            session.submit_answer(&title, &artist, elapsed, player_index)
        };
        print_outcome(session, &outcome, out)?;

        if session.next_round()? == RoundAdvance::Finished {
            break;
        }
    }

    writeln!(out)?;
    print_standings(session, out)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io::Cursor, rc::Rc};

    use super::*;
    use crate::{
        config::GameSettings,
        domain::track::Track,
        game::{GameMode, ScoreEntry, catalog::StaticCatalog},
    };

    type Recorded = Rc<RefCell<Vec<ScoreEntry>>>;

    fn one_track_session(names: &[&str], mode: GameMode) -> (Session, Recorded) {
        let catalog = StaticCatalog::from_tracks(
            [(
                "test".to_string(),
                vec![Track::new("Creep", "Radiohead", 238)],
            )],
            "test",
        );
        let settings = GameSettings {
            rounds: 1,
            extract_duration_secs: 600,
            speed_bonus_enabled: false,
            default_genre: "test".to_string(),
            seed: Some(1),
            ..Default::default()
        };
        let recorded: Recorded = Rc::default();
        let session = Session::new(
            names.iter().map(|n| n.to_string()).collect(),
            mode,
            "test",
            settings,
            &catalog,
            Box::new(Rc::clone(&recorded)),
        )
        .unwrap();
        (session, recorded)
    }

    fn run(session: &mut Session, script: &str) -> anyhow::Result<(bool, String)> {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let completed = play(session, &mut input, &mut out)?;
        Ok((completed, String::from_utf8(out)?))
    }

    #[test]
    fn test_play_solo_game() -> anyhow::Result<()> {
        let (mut session, recorded) = one_track_session(&["alice"], GameMode::Solo);

        let (completed, out) = run(&mut session, "creep\nradiohead\n")?;

        assert!(completed);
        assert!(out.contains("Round 1/1: alice's turn"));
        assert!(out.contains("Title:  _____"));
        assert!(out.contains("Solo game, genre 'test', 1 rounds"));
        assert!(out.contains("title: yes, artist: yes, +2 points"));
        assert!(out.contains("it was \"Creep\" by Radiohead (3:58)"));
        assert!(out.contains("Final scores:"));
        assert!(out.contains("  Radiohead - Creep"));
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(recorded.borrow()[0].points, 2);

        Ok(())
    }

    #[test]
    fn test_hint_command_reveals_a_letter() -> anyhow::Result<()> {
        let (mut session, recorded) = one_track_session(&["alice"], GameMode::Solo);

        let (_, out) = run(&mut session, "?\ncreep\nwho knows\n")?;

        assert!(out.contains("C____") || out.contains("R________"));
        assert!(out.contains("title: yes, artist: no, +1 points"));
        assert_eq!(recorded.borrow()[0].hints_used, 1);

        Ok(())
    }

    #[test]
    fn test_duel_game_plays_both_turns() -> anyhow::Result<()> {
        let (mut session, recorded) = one_track_session(&["alice", "bob"], GameMode::Duel);

        let (completed, out) = run(&mut session, "creep\nradiohead\nx\ny\n")?;

        assert!(completed);
        assert!(out.contains("Round 1/2: alice's turn"));
        assert!(out.contains("Round 2/2: bob's turn"));
        let recorded = recorded.borrow();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].points, 2);
        assert_eq!(recorded[1].points, 0);

        Ok(())
    }

    #[test]
    fn test_end_of_input_abandons_game() -> anyhow::Result<()> {
        let (mut session, recorded) = one_track_session(&["alice"], GameMode::Solo);

        let (completed, out) = run(&mut session, "creep\n")?;

        assert!(!completed);
        assert!(out.contains("Game abandoned"));
        assert_eq!(session.state(), SessionState::InProgress);
        assert!(recorded.borrow().is_empty());

        Ok(())
    }
}
