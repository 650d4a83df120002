use cricket_terminal::model::{MatchStat, Player, Role, TeamStats, TopPerformer};
use cricket_terminal::state::{AppState, Delta, Overlay, ToastLevel, apply_delta};

fn stat(date: &str, score: i32) -> MatchStat {
    MatchStat {
        date: date.to_string(),
        score,
        opponent: "Opp".to_string(),
        venue: "Ground".to_string(),
        is_home: true,
    }
}

fn roster() -> Vec<Player> {
    vec![
        Player::new(1, "Virat Kohli", Role::Batsman)
            .with_stats(vec![stat("2024-01-01", 40), stat("2024-01-02", 60)]),
        Player::new(2, "Jasprit Bumrah", Role::Bowler).with_stats(vec![stat("2024-01-01", 4)]),
        Player::new(3, "Rohit Sharma", Role::Batsman).with_stats(vec![stat("2024-01-03", 20)]),
    ]
}

#[test]
fn set_players_replaces_store() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    assert_eq!(state.store.len(), 3);
    assert!(state.store.loaded_at().is_some());
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] Loaded 3 players"));

    apply_delta(
        &mut state,
        Delta::SetPlayers(vec![Player::new(9, "Solo", Role::Bowler)]),
    );
    assert_eq!(state.store.len(), 1);
    assert!(state.store.find(1).is_none());
}

#[test]
fn older_snapshot_is_unaffected_by_reload() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    let before = state.store.clone();
    apply_delta(&mut state, Delta::SetPlayers(Vec::new()));
    assert_eq!(before.len(), 3);
    assert!(before.find(1).is_some());
    assert!(state.store.is_empty());
}

#[test]
fn failed_load_keeps_previous_data() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    apply_delta(
        &mut state,
        Delta::Toast {
            level: ToastLevel::Error,
            message: "Cannot connect to server. Please start the backend.".to_string(),
        },
    );
    assert_eq!(state.store.len(), 3);
    let toast = state.toast.as_ref().expect("toast shown");
    assert_eq!(toast.level, ToastLevel::Error);
    assert!(state.logs.iter().any(|l| l.starts_with("[ERROR] Cannot connect")));
}

#[test]
fn reload_after_delete_updates_team_average() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    // (50 + 4 + 20) / 3
    assert!((state.store.team_average() - 74.0 / 3.0).abs() < 1e-9);

    apply_delta(
        &mut state,
        Delta::PlayerDeleted {
            id: 2,
            name: "Jasprit Bumrah".to_string(),
        },
    );
    let remaining: Vec<_> = roster().into_iter().filter(|p| p.id != 2).collect();
    apply_delta(&mut state, Delta::SetPlayers(remaining));

    assert!(state.store.find(2).is_none());
    assert!((state.store.team_average() - 35.0).abs() < 1e-9);
    assert_eq!(state.store.total_matches(), 3);
}

#[test]
fn selection_is_clamped_on_shrink() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    state.selected = 2;
    apply_delta(&mut state, Delta::SetPlayers(roster().into_iter().take(1).collect()));
    assert_eq!(state.selected, 0);
}

#[test]
fn detail_overlay_closes_when_player_disappears() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    state.overlay = Some(Overlay::PlayerDetail { player_id: 3 });
    apply_delta(&mut state, Delta::SetPlayers(roster().into_iter().take(2).collect()));
    assert_eq!(state.overlay, None);
}

#[test]
fn reload_clears_stale_match_form_player() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    state.match_form.player_id = Some(3);
    apply_delta(&mut state, Delta::SetPlayers(roster().into_iter().take(2).collect()));
    assert_eq!(state.match_form.player_id, None);
}

#[test]
fn server_panels_are_stored() {
    let mut state = AppState::new();
    assert!(state.top_performers.is_none());
    let rows = vec![TopPerformer {
        id: Some(1),
        name: "Virat Kohli".to_string(),
        role: Role::Batsman,
        average: 50.0,
    }];
    apply_delta(&mut state, Delta::SetTopPerformers(rows.clone()));
    apply_delta(&mut state, Delta::SetPlayersInForm(Vec::new()));
    apply_delta(&mut state, Delta::SetTeamStats(TeamStats::default()));
    assert_eq!(state.top_performers, Some(rows));
    assert_eq!(state.players_in_form, Some(Vec::new()));
    assert_eq!(state.team_stats, Some(TeamStats::default()));
}

#[test]
fn player_added_resets_form_and_closes_overlay() {
    let mut state = AppState::new();
    state.open_add_player();
    state.player_form.name = "New Guy".to_string();
    apply_delta(&mut state, Delta::PlayerAdded);
    assert_eq!(state.overlay, None);
    assert!(state.player_form.name.is_empty());
    let toast = state.toast.as_ref().expect("toast shown");
    assert_eq!(toast.level, ToastLevel::Success);
    assert_eq!(toast.message, "Player added successfully!");
}

#[test]
fn match_added_resets_form() {
    let mut state = AppState::new();
    state.match_form_active = true;
    state.match_form.score = "55".to_string();
    apply_delta(&mut state, Delta::MatchAdded);
    assert!(!state.match_form_active);
    assert!(state.match_form.score.is_empty());
    assert_eq!(
        state.toast.as_ref().map(|t| t.message.as_str()),
        Some("Match statistics added successfully!")
    );
}

#[test]
fn player_deleted_closes_matching_detail() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetPlayers(roster()));
    state.overlay = Some(Overlay::PlayerDetail { player_id: 1 });
    apply_delta(
        &mut state,
        Delta::PlayerDeleted {
            id: 1,
            name: "Virat Kohli".to_string(),
        },
    );
    assert_eq!(state.overlay, None);
    assert_eq!(
        state.toast.as_ref().map(|t| t.message.as_str()),
        Some("Player \"Virat Kohli\" deleted successfully!")
    );
}

#[test]
fn logs_are_capped() {
    let mut state = AppState::new();
    for idx in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("line {idx}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
}
