use crate::{
    error::ApiError,
    game::{
        CrosswordPlay, PlayError, PlaySession, PlayState, SelectionValidator, WordConnectPlay,
        WordSearchPlay,
    },
    models::Position,
    websocket::messages::{ClientMessage, DragTarget, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Per-socket state: which session this connection is playing
#[derive(Debug, Default)]
pub struct Connection {
    pub session_id: Option<Uuid>,
}

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    tracing::info!("WebSocket connection established: {}", connection_id);

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        let mut connection = Connection::default();

        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let replies = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(client_msg) => {
                            handle_client_message(client_msg, &state_for_recv, &mut connection)
                                .unwrap_or_else(|e| {
                                    tracing::debug!("Rejected message on {}: {}", connection_id, e);
                                    vec![ServerMessage::Error {
                                        message: e.to_string(),
                                    }]
                                })
                        }
                        Err(e) => {
                            tracing::error!("Failed to parse message: {}", e);
                            vec![ServerMessage::Error {
                                message: format!("Invalid message format: {}", e),
                            }]
                        }
                    };

                    for reply in replies {
                        if tx.send(reply).await.is_err() {
                            return;
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Client disconnected: {}", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    // The play session outlives the socket so the client can resume it
    tracing::info!("WebSocket connection closed: {}", connection_id);
}

/// Handle one client message and produce the replies for it
pub fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    connection: &mut Connection,
) -> Result<Vec<ServerMessage>, ApiError> {
    match msg {
        ClientMessage::StartGame { game } => {
            let play = game.build(&state.config.game)?;
            let session = PlaySession::new(play);
            let snapshot = session.snapshot();

            tracing::info!("Started {} session {} over WebSocket", session.state.kind(), session.id);
            connection.session_id = Some(session.id);
            state.sessions.insert(session.id, session);

            Ok(vec![ServerMessage::GameStarted { session: snapshot }])
        }
        ClientMessage::ResumeGame { session_id } => {
            let snapshot = state
                .sessions
                .get_mut(&session_id)
                .map(|mut session| {
                    session.touch();
                    session.snapshot()
                })
                .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;

            connection.session_id = Some(session_id);
            Ok(vec![ServerMessage::GameStarted { session: snapshot }])
        }
        ClientMessage::LeaveGame => {
            connection.session_id = None;
            Ok(vec![ServerMessage::GameLeft])
        }
        play_move => {
            let session_id = connection
                .session_id
                .ok_or_else(|| ApiError::Validation("no game in progress".to_string()))?;
            let mut session = state
                .sessions
                .get_mut(&session_id)
                .ok_or_else(|| ApiError::NotFound(format!("session {}", session_id)))?;
            session.touch();

            Ok(apply_move(&mut session.state, play_move)?)
        }
    }
}

fn apply_move(state: &mut PlayState, msg: ClientMessage) -> Result<Vec<ServerMessage>, PlayError> {
    let was_complete = state.is_complete();

    let mut replies = match &mut *state {
        PlayState::WordSearch(play) => word_search_move(play, msg)?,
        PlayState::Crossword(play) => crossword_move(play, msg)?,
        PlayState::WordConnect(play) => word_connect_move(play, msg)?,
    };

    if !was_complete && state.is_complete() {
        replies.push(ServerMessage::GameComplete);
    }
    Ok(replies)
}

fn word_search_move(
    play: &mut WordSearchPlay,
    msg: ClientMessage,
) -> Result<Vec<ServerMessage>, PlayError> {
    match msg {
        ClientMessage::DragBegin {
            target: DragTarget::Cell { row, col },
        } => {
            let start = Position::new(row, col);
            SelectionValidator::cells_in_bounds(play.puzzle().size, &[start])?;
            let cells = play.begin_drag(start).to_vec();
            Ok(vec![ServerMessage::Selection { cells }])
        }
        ClientMessage::DragExtend {
            target: DragTarget::Cell { row, col },
        } => {
            let cells = play
                .extend_drag(Position::new(row, col))
                .ok_or(PlayError::NotDragging)?
                .to_vec();
            Ok(vec![ServerMessage::Selection { cells }])
        }
        ClientMessage::DragRelease => {
            let (cells, hit) = play.release_drag().ok_or(PlayError::NotDragging)?;
            let reply = match hit {
                Some(idx) => ServerMessage::WordFound {
                    word: play.puzzle().placements[idx].word.clone(),
                },
                None => ServerMessage::WordMissed {
                    attempt: play.puzzle().read_path(&cells),
                },
            };
            Ok(vec![reply])
        }
        _ => Err(PlayError::WrongGame("word_search")),
    }
}

fn crossword_move(
    play: &mut CrosswordPlay,
    msg: ClientMessage,
) -> Result<Vec<ServerMessage>, PlayError> {
    match msg {
        ClientMessage::EnterLetter { row, col, value } => {
            let letter = play.enter(Position::new(row, col), &value)?;
            Ok(vec![ServerMessage::CrosswordProgress {
                letter,
                completed: play.completed_ids().to_vec(),
            }])
        }
        _ => Err(PlayError::WrongGame("crossword")),
    }
}

fn word_connect_move(
    play: &mut WordConnectPlay,
    msg: ClientMessage,
) -> Result<Vec<ServerMessage>, PlayError> {
    match msg {
        ClientMessage::DragBegin {
            target: DragTarget::Node { node },
        } => {
            play.begin(node)?;
            Ok(vec![trace(play)])
        }
        ClientMessage::DragExtend {
            target: DragTarget::Node { node },
        } => {
            play.extend(node)?;
            Ok(vec![trace(play)])
        }
        ClientMessage::DragRelease => {
            if !play.is_dragging() {
                return Err(PlayError::NotDragging);
            }
            let attempt = play.current();
            let reply = match play.release() {
                Some(word) => ServerMessage::WordFound { word },
                None => ServerMessage::WordMissed { attempt },
            };
            Ok(vec![reply])
        }
        _ => Err(PlayError::WrongGame("word_connect")),
    }
}

fn trace(play: &WordConnectPlay) -> ServerMessage {
    ServerMessage::Trace {
        nodes: play.selection().to_vec(),
        letters: play.current(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Catalog, config::Config, game::GameSetup};
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(Config::for_tests(), Catalog::builtin())
    }

    fn message(value: serde_json::Value) -> ClientMessage {
        serde_json::from_value(value).unwrap()
    }

    fn start(state: &AppState, connection: &mut Connection, game: GameSetup) {
        let replies =
            handle_client_message(ClientMessage::StartGame { game }, state, connection).unwrap();
        assert!(matches!(replies[0], ServerMessage::GameStarted { .. }));
    }

    #[test]
    fn test_moves_without_game_are_rejected() {
        let state = test_state();
        let mut connection = Connection::default();
        let result = handle_client_message(
            message(json!({"type": "drag_release"})),
            &state,
            &mut connection,
        );
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_word_connect_drag_flow() {
        let state = test_state();
        let mut connection = Connection::default();
        start(
            &state,
            &mut connection,
            GameSetup::WordConnect {
                words: vec!["SOL".to_string()],
            },
        );

        // Nodes are S, O, L in first-seen order
        for (kind, node) in [("drag_begin", 0), ("drag_extend", 1), ("drag_extend", 2)] {
            let replies = handle_client_message(
                message(json!({"type": kind, "target": {"node": node}})),
                &state,
                &mut connection,
            )
            .unwrap();
            assert!(matches!(replies[0], ServerMessage::Trace { .. }));
        }

        let replies = handle_client_message(
            message(json!({"type": "drag_release"})),
            &state,
            &mut connection,
        )
        .unwrap();
        match &replies[..] {
            [ServerMessage::WordFound { word }, ServerMessage::GameComplete] => {
                assert_eq!(word, "SOL")
            }
            other => panic!("unexpected replies: {:?}", other),
        }
    }

    #[test]
    fn test_cell_target_on_word_connect_is_wrong_game() {
        let state = test_state();
        let mut connection = Connection::default();
        start(
            &state,
            &mut connection,
            GameSetup::WordConnect {
                words: vec!["SOL".to_string()],
            },
        );
        let result = handle_client_message(
            message(json!({"type": "drag_begin", "target": {"row": 0, "col": 0}})),
            &state,
            &mut connection,
        );
        assert!(matches!(
            result,
            Err(ApiError::Play(PlayError::WrongGame("word_connect")))
        ));
    }

    #[test]
    fn test_word_search_drag_finds_placed_word() {
        let state = test_state();
        let mut connection = Connection::default();
        start(
            &state,
            &mut connection,
            GameSetup::WordSearch {
                words: vec!["LUNA".to_string()],
                size: Some(6),
                seed: Some(4),
            },
        );

        let session_id = connection.session_id.unwrap();
        let cells = match &state.sessions.get(&session_id).unwrap().state {
            PlayState::WordSearch(play) => play.puzzle().placements[0].cells.clone(),
            _ => unreachable!(),
        };
        let (first, last) = (cells[0], cells[cells.len() - 1]);

        handle_client_message(
            message(json!({"type": "drag_begin", "target": {"row": last.row, "col": last.col}})),
            &state,
            &mut connection,
        )
        .unwrap();
        handle_client_message(
            message(json!({"type": "drag_extend", "target": {"row": first.row, "col": first.col}})),
            &state,
            &mut connection,
        )
        .unwrap();
        let replies = handle_client_message(
            message(json!({"type": "drag_release"})),
            &state,
            &mut connection,
        )
        .unwrap();

        assert!(matches!(&replies[0], ServerMessage::WordFound { word } if word == "LUNA"));
        assert!(matches!(replies[1], ServerMessage::GameComplete));
    }

    #[test]
    fn test_word_search_drag_toward_far_cell_is_clipped() {
        let state = test_state();
        let mut connection = Connection::default();
        start(
            &state,
            &mut connection,
            GameSetup::WordSearch {
                words: vec!["SOL".to_string()],
                size: Some(6),
                seed: Some(2),
            },
        );

        handle_client_message(
            message(json!({"type": "drag_begin", "target": {"row": 2, "col": 0}})),
            &state,
            &mut connection,
        )
        .unwrap();
        let replies = handle_client_message(
            message(json!({"type": "drag_extend", "target": {"row": 2, "col": u64::MAX / 4}})),
            &state,
            &mut connection,
        )
        .unwrap();

        match &replies[..] {
            [ServerMessage::Selection { cells }] => {
                assert_eq!(cells.len(), 6);
                assert_eq!(cells[5], Position::new(2, 5));
            }
            other => panic!("unexpected replies: {:?}", other),
        }
    }

    #[test]
    fn test_resume_and_leave() {
        let state = test_state();
        let mut first = Connection::default();
        start(
            &state,
            &mut first,
            GameSetup::WordConnect {
                words: vec!["MAR".to_string()],
            },
        );
        let session_id = first.session_id.unwrap();

        let mut second = Connection::default();
        let replies = handle_client_message(
            ClientMessage::ResumeGame { session_id },
            &state,
            &mut second,
        )
        .unwrap();
        assert!(matches!(replies[0], ServerMessage::GameStarted { .. }));
        assert_eq!(second.session_id, Some(session_id));

        let replies =
            handle_client_message(ClientMessage::LeaveGame, &state, &mut second).unwrap();
        assert!(matches!(replies[0], ServerMessage::GameLeft));
        assert!(second.session_id.is_none());
        assert!(state.sessions.contains_key(&session_id));
    }
}
