//! Line classification into status updates.

use endscreen_status::{MissionStatus, Notification, PlayerStatus, Session};
use regex::Regex;

/// A line passed the loose containment gate for a pattern but could not be
/// used.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The stricter extraction regex did not match the gated line.
    #[error("malformed {pattern} line: {line:?}")]
    PatternMismatch {
        pattern: &'static str,
        line: String,
    },

    /// A difficulty line arrived before any mission announcement.
    #[error("difficulty line before any mission name")]
    MissingMissionContext,
}

/// Fields extracted from a "Player name changed" line. The account id is
/// surfaced for observability only and never stored.
#[derive(Debug, PartialEq)]
struct PlayerLine {
    name: String,
    clan: String,
    account_id: String,
}

/// Matches log lines against the known patterns and applies their effect to
/// the session.
///
/// Patterns are mutually exclusive per line, checked top to bottom, first
/// match wins. Each one sits behind a named extraction function returning a
/// typed result; a gated line that fails its extraction is an explicit
/// error.
pub struct Classifier {
    player_re: Regex,
    mission_re: Regex,
    difficulty_re: Regex,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            player_re: Regex::new(r"Player name changed to (\w+) Clan: (\w+) AccountId: (\w+)")
                .unwrap(),
            mission_re: Regex::new(r"Mission name: (.+)").unwrap(),
            difficulty_re: Regex::new(r"    difficulty=(.+)").unwrap(),
        }
    }

    /// Applies one log line to the session.
    ///
    /// Returns a notification when the line reports a finished mission and
    /// `Ok(None)` for every other line, including ones that match no
    /// pattern at all (those leave the session untouched).
    pub fn classify(
        &self,
        line: &str,
        session: &mut Session,
    ) -> Result<Option<Notification>, ClassifyError> {
        if line.contains("Player name changed") {
            let player = self.extract_player(line)?;
            tracing::info!(
                name = %player.name,
                clan = %player.clan,
                account_id = %player.account_id,
                "player identified"
            );
            session.player = PlayerStatus {
                name: player.name,
                clan: player.clan,
            };
        } else if line.contains("Mission name:") {
            let name = self.extract_mission_name(line)?;
            tracing::info!(mission = %name, "mission started");
            session.mission = Some(MissionStatus::new(name));
        } else if line.starts_with("    difficulty=") {
            let difficulty = self.extract_difficulty(line)?;
            let mission = session
                .mission
                .as_mut()
                .ok_or(ClassifyError::MissingMissionContext)?;
            tracing::info!(difficulty = %difficulty, "mission difficulty");
            mission.difficulty = difficulty;
        } else if line.contains("EndOfMatch.lua: Mission Succeeded") {
            tracing::info!("mission succeeded");
            return Ok(Some(Notification::MissionComplete {
                player: session.player.clone(),
                mission: session.mission.clone().unwrap_or_default(),
            }));
        }

        Ok(None)
    }

    fn extract_player(&self, line: &str) -> Result<PlayerLine, ClassifyError> {
        let caps = self
            .player_re
            .captures(line)
            .ok_or_else(|| ClassifyError::PatternMismatch {
                pattern: "player name",
                line: line.to_string(),
            })?;
        Ok(PlayerLine {
            name: caps[1].to_string(),
            clan: caps[2].to_string(),
            account_id: caps[3].to_string(),
        })
    }

    fn extract_mission_name(&self, line: &str) -> Result<String, ClassifyError> {
        let caps = self
            .mission_re
            .captures(line)
            .ok_or_else(|| ClassifyError::PatternMismatch {
                pattern: "mission name",
                line: line.to_string(),
            })?;
        Ok(caps[1].to_string())
    }

    fn extract_difficulty(&self, line: &str) -> Result<String, ClassifyError> {
        let caps = self
            .difficulty_re
            .captures(line)
            .ok_or_else(|| ClassifyError::PatternMismatch {
                pattern: "difficulty",
                line: line.to_string(),
            })?;
        Ok(caps[1].to_string())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Follower;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const PLAYER_LINE: &str = "Player name changed to Tenno Clan: Lotus AccountId: 123";
    const SUCCESS_LINE: &str =
        "Script [Info]: EndOfMatch.lua: Mission Succeeded - timer stopped";

    #[test]
    fn player_line_sets_identity() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        let out = classifier.classify(PLAYER_LINE, &mut session).unwrap();
        assert!(out.is_none());
        assert_eq!(
            session.player,
            PlayerStatus {
                name: "Tenno".into(),
                clan: "Lotus".into(),
            }
        );
    }

    #[test]
    fn player_line_overwrites_previous_identity() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        classifier.classify(PLAYER_LINE, &mut session).unwrap();
        classifier
            .classify(
                "Player name changed to Operator Clan: Zariman AccountId: 456",
                &mut session,
            )
            .unwrap();

        assert_eq!(session.player.name, "Operator");
        assert_eq!(session.player.clan, "Zariman");
    }

    #[test]
    fn mission_name_starts_fresh_record() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        classifier
            .classify("Mission name: Apollo (Lua)", &mut session)
            .unwrap();
        classifier
            .classify("    difficulty=Steel Path", &mut session)
            .unwrap();
        classifier
            .classify("Mission name: Void Survival", &mut session)
            .unwrap();

        // The new mission must not inherit the old difficulty.
        let mission = session.mission.as_ref().unwrap();
        assert_eq!(mission.name, "Void Survival");
        assert!(mission.difficulty.is_empty());
    }

    #[test]
    fn difficulty_attaches_to_latest_mission() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        classifier.classify("Mission name: A", &mut session).unwrap();
        classifier.classify("Mission name: B", &mut session).unwrap();
        classifier
            .classify("    difficulty=Nightmare", &mut session)
            .unwrap();

        let mission = session.mission.as_ref().unwrap();
        assert_eq!(mission.name, "B");
        assert_eq!(mission.difficulty, "Nightmare");
    }

    #[test]
    fn difficulty_without_mission_is_an_error() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        let err = classifier
            .classify("    difficulty=Steel Path", &mut session)
            .unwrap_err();
        assert!(matches!(err, ClassifyError::MissingMissionContext));
        assert!(session.mission.is_none());
    }

    #[test]
    fn difficulty_requires_four_space_indent() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        classifier.classify("Mission name: A", &mut session).unwrap();
        let out = classifier
            .classify("difficulty=Steel Path", &mut session)
            .unwrap();

        assert!(out.is_none());
        assert!(session.mission.as_ref().unwrap().difficulty.is_empty());
    }

    #[test]
    fn unrelated_lines_change_nothing() {
        let classifier = Classifier::new();
        let mut session = Session::default();
        classifier.classify(PLAYER_LINE, &mut session).unwrap();
        classifier
            .classify("Mission name: Void Survival", &mut session)
            .unwrap();
        let before = session.clone();

        let out = classifier
            .classify("Sys [Info]: Logged in successfully", &mut session)
            .unwrap();

        assert!(out.is_none());
        assert_eq!(session, before);
    }

    #[test]
    fn malformed_player_line_is_a_mismatch() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        // Gate substring present, extraction fields missing.
        let err = classifier
            .classify("Player name changed (details unavailable)", &mut session)
            .unwrap_err();

        assert!(matches!(
            err,
            ClassifyError::PatternMismatch {
                pattern: "player name",
                ..
            }
        ));
        assert_eq!(session, Session::default());
    }

    #[test]
    fn mission_succeeded_emits_notification() {
        let classifier = Classifier::new();
        let mut session = Session::default();
        classifier.classify(PLAYER_LINE, &mut session).unwrap();
        classifier
            .classify("Mission name: Void Survival", &mut session)
            .unwrap();

        let out = classifier.classify(SUCCESS_LINE, &mut session).unwrap();

        let Some(Notification::MissionComplete { player, mission }) = out else {
            panic!("expected a mission complete notification");
        };
        assert_eq!(player.name, "Tenno");
        assert_eq!(mission.name, "Void Survival");
    }

    #[test]
    fn success_before_any_mission_carries_empty_record() {
        let classifier = Classifier::new();
        let mut session = Session::default();

        let out = classifier.classify(SUCCESS_LINE, &mut session).unwrap();

        let Some(Notification::MissionComplete { mission, .. }) = out else {
            panic!("expected a mission complete notification");
        };
        assert_eq!(mission, MissionStatus::default());
    }

    #[test]
    fn end_to_end_scenario() {
        let classifier = Classifier::new();
        let mut session = Session::default();
        let lines = [
            "Player name changed to Tenno Clan: Lotus AccountId: 123",
            "Mission name: Void Survival",
            "    difficulty=Steel Path",
            "EndOfMatch.lua: Mission Succeeded",
        ];

        let mut notifications = Vec::new();
        for line in lines {
            if let Some(n) = classifier.classify(line, &mut session).unwrap() {
                notifications.push(n);
            }
        }

        assert_eq!(notifications.len(), 1);
        let Notification::MissionComplete { player, mission } = &notifications[0];
        assert_eq!(
            *player,
            PlayerStatus {
                name: "Tenno".into(),
                clan: "Lotus".into(),
            }
        );
        assert_eq!(
            *mission,
            MissionStatus {
                name: "Void Survival".into(),
                difficulty: "Steel Path".into(),
            }
        );
    }

    #[tokio::test]
    async fn full_mission_sequence_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("EE.log");
        std::fs::write(
            &path,
            "Player name changed to Tenno Clan: Lotus AccountId: 123\n\
             Mission name: Void Survival\n\
             \x20   difficulty=Steel Path\n\
             EndOfMatch.lua: Mission Succeeded\n",
        )
        .unwrap();

        let cancel = CancellationToken::new();
        let mut follower =
            Follower::open(&path, Duration::from_millis(10), cancel.clone()).unwrap();
        let classifier = Classifier::new();
        let mut session = Session::default();
        let mut notifications = Vec::new();

        for _ in 0..4 {
            let line = follower.next_line().await.unwrap().unwrap();
            if let Some(n) = classifier.classify(&line, &mut session).unwrap() {
                notifications.push(n);
            }
        }

        assert_eq!(notifications.len(), 1);
        let mission = session.mission.as_ref().unwrap();
        assert_eq!(mission.name, "Void Survival");
        assert_eq!(mission.difficulty, "Steel Path");

        cancel.cancel();
        assert!(follower.next_line().await.unwrap().is_none());
    }
}
