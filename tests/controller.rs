use cricket_terminal::model::{MatchStat, Player, Role};
use cricket_terminal::state::{
    AppState, Delta, Overlay, ProviderCommand, Tab, ToastLevel, apply_delta,
};

fn loaded_state() -> AppState {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetPlayers(vec![
            Player::new(1, "Virat Kohli", Role::Batsman).with_stats(vec![MatchStat {
                date: "2024-01-01".to_string(),
                score: 50,
                opponent: "Australia".to_string(),
                venue: "Mumbai".to_string(),
                is_home: true,
            }]),
            Player::new(2, "Jasprit Bumrah", Role::Bowler),
            Player::new(3, "Rohit Sharma", Role::Batsman),
        ]),
    );
    state
}

fn error_toast(state: &AppState) -> Option<&str> {
    state
        .toast
        .as_ref()
        .filter(|t| t.level == ToastLevel::Error)
        .map(|t| t.message.as_str())
}

#[test]
fn startup_loads_roster_and_dashboard() {
    let state = AppState::new();
    assert_eq!(
        state.startup_commands(),
        vec![
            ProviderCommand::LoadPlayers,
            ProviderCommand::FetchTopPerformers,
            ProviderCommand::FetchPlayersInForm,
        ]
    );
}

#[test]
fn switching_tabs_requests_tab_data() {
    let mut state = loaded_state();
    assert_eq!(
        state.switch_tab(Tab::Players),
        vec![ProviderCommand::LoadPlayers]
    );
    assert_eq!(
        state.switch_tab(Tab::Statistics),
        vec![ProviderCommand::FetchTeamStats]
    );
    assert!(state.switch_tab(Tab::AddMatch).is_empty());
    assert_eq!(
        state.switch_tab(Tab::Dashboard),
        vec![
            ProviderCommand::FetchTopPerformers,
            ProviderCommand::FetchPlayersInForm,
        ]
    );
    assert_eq!(state.tab, Tab::Dashboard);
}

#[test]
fn refresh_reloads_roster_and_current_tab() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Statistics);
    assert_eq!(
        state.refresh(),
        vec![ProviderCommand::LoadPlayers, ProviderCommand::FetchTeamStats]
    );
}

#[test]
fn search_filters_by_name_or_role() {
    let mut state = loaded_state();
    for ch in "BOWL".chars() {
        state.push_search_char(ch);
    }
    let names: Vec<_> = state.filtered_players().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Jasprit Bumrah"]);

    state.search = "sharma".to_string();
    assert_eq!(state.filtered_players().len(), 1);

    state.search = "   ".to_string();
    assert_eq!(state.filtered_players().len(), 3);
}

#[test]
fn selection_wraps() {
    let mut state = loaded_state();
    state.select_prev();
    assert_eq!(state.selected, 2);
    state.select_next();
    assert_eq!(state.selected, 0);
}

#[test]
fn add_player_requires_name_and_role() {
    let mut state = loaded_state();
    state.open_add_player();
    assert_eq!(state.submit_player_form(), None);
    assert_eq!(error_toast(&state), Some("Please fill in all fields"));

    state.player_form.name = "Shubman Gill".to_string();
    assert_eq!(state.submit_player_form(), None);

    state.player_form.focus_next();
    state.player_form.cycle_choice(true);
    assert_eq!(state.player_form.role, Some(Role::Batsman));
    match state.submit_player_form() {
        Some(ProviderCommand::CreatePlayer(player)) => {
            assert_eq!(player.name, "Shubman Gill");
            assert_eq!(player.role, Role::Batsman);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn role_choice_cycles_both_ways() {
    let mut state = AppState::new();
    state.player_form.focus_next();
    state.player_form.cycle_choice(false);
    assert_eq!(state.player_form.role, Some(Role::Bowler));
    state.player_form.cycle_choice(true);
    assert_eq!(state.player_form.role, Some(Role::Batsman));
}

#[test]
fn add_match_with_unknown_player_is_rejected() {
    let mut state = loaded_state();
    state.match_form.player_id = Some(42);
    state.match_form.score = "10".to_string();
    assert_eq!(state.submit_match_form(), None);
    assert_eq!(error_toast(&state), Some("Player not found!"));
}

#[test]
fn add_match_rejects_non_numeric_score() {
    let mut state = loaded_state();
    state.match_form.player_id = Some(1);
    state.match_form.score = "fifty".to_string();
    assert_eq!(state.submit_match_form(), None);
    assert_eq!(error_toast(&state), Some("Score must be a whole number"));
}

#[test]
fn add_match_sends_player_name() {
    let mut state = loaded_state();
    state.match_form.cycle_choice(state.store.players(), true);
    state.match_form.cycle_choice(state.store.players(), true);
    assert_eq!(state.match_form.player_id, Some(2));

    state.match_form.focus_next();
    for ch in "2024-04-01".chars() {
        state.match_form.push_char(ch);
    }
    state.match_form.focus_next();
    for ch in " 3 ".chars() {
        state.match_form.push_char(ch);
    }
    state.match_form.focus_next();
    state.match_form.push_char('X');
    state.match_form.backspace();
    for ch in "England".chars() {
        state.match_form.push_char(ch);
    }
    state.match_form.focus_next();
    for ch in "Lord's".chars() {
        state.match_form.push_char(ch);
    }
    state.match_form.focus_next();
    state.match_form.cycle_choice(state.store.players(), true);

    match state.submit_match_form() {
        Some(ProviderCommand::AddMatch(entry)) => {
            assert_eq!(entry.player_name, "Jasprit Bumrah");
            assert_eq!(entry.date, "2024-04-01");
            assert_eq!(entry.score, 3);
            assert_eq!(entry.opponent, "England");
            assert_eq!(entry.venue, "Lord's");
            assert!(!entry.is_home);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn delete_requires_confirmation() {
    let mut state = loaded_state();
    state.switch_tab(Tab::Players);
    state.select_next();
    state.request_delete();
    assert_eq!(
        state.overlay,
        Some(Overlay::ConfirmDelete {
            player_id: 2,
            name: "Jasprit Bumrah".to_string(),
        })
    );

    assert_eq!(state.resolve_delete(false), None);
    assert_eq!(state.overlay, None);
    assert!(state.logs.back().is_some_and(|l| l.contains("cancelled")));

    state.request_delete();
    assert_eq!(
        state.resolve_delete(true),
        Some(ProviderCommand::DeletePlayer {
            id: 2,
            name: "Jasprit Bumrah".to_string(),
        })
    );
    assert_eq!(state.overlay, None);
}

#[test]
fn delete_from_detail_targets_detailed_player() {
    let mut state = loaded_state();
    state.selected = 0;
    state.overlay = Some(Overlay::PlayerDetail { player_id: 3 });
    state.request_delete();
    assert!(matches!(
        state.overlay,
        Some(Overlay::ConfirmDelete { player_id: 3, .. })
    ));
}

#[test]
fn resolve_without_prompt_does_nothing() {
    let mut state = loaded_state();
    state.toggle_help();
    assert_eq!(state.resolve_delete(true), None);
    assert_eq!(state.overlay, Some(Overlay::Help));
}

#[test]
fn detail_opens_for_selection() {
    let mut state = loaded_state();
    state.select_next();
    state.open_selected_detail();
    assert_eq!(state.overlay, Some(Overlay::PlayerDetail { player_id: 2 }));
}

#[test]
fn toast_expires() {
    use std::time::{Duration, Instant};

    let mut state = AppState::new();
    state.show_toast(ToastLevel::Info, "hello");
    let shown = state.toast.as_ref().map(|t| t.shown_at).expect("toast shown");
    assert!(state.active_toast(shown + Duration::from_secs(1)).is_some());
    state.expire_toast(shown + Duration::from_secs(4));
    assert!(state.toast.is_none());
    assert!(state.active_toast(Instant::now()).is_none());
}
