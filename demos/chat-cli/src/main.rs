use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use simplechat::prelude::*;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
commands:
  /connect [nick]     connect (asks for a nickname if none given)
  /disconnect         close the connection
  /toggle             connect or disconnect, like the toolbar button
  /join <room>        join or create a room
  /part [room]        leave a room (default: current room)
  /say <room> <text>  say something in a room
  /list               refresh the active room list
  /quit               exit
  <text>              say something in the current room";

// ---------------------------------------------------------------------------
// Terminal UI
// ---------------------------------------------------------------------------

#[derive(Default)]
struct UiState {
    windows: Vec<String>,
    current_room: Option<String>,
}

/// Plays every UI role by printing to stdout.
#[derive(Clone, Default)]
struct TerminalUi {
    state: Arc<Mutex<UiState>>,
}

impl TerminalUi {
    fn state(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_room(&self) -> Option<String> {
        self.state().current_room.clone()
    }

    fn forget_room(&self, room: &str) {
        let mut state = self.state();
        state.windows.retain(|w| w != room);
        if state.current_room.as_deref() == Some(room) {
            state.current_room = state.windows.last().cloned();
        }
    }
}

impl RoomListView for TerminalUi {
    fn update_list(&mut self, rooms: Vec<RoomSummary>) {
        if rooms.is_empty() {
            println!("-- no active rooms");
            return;
        }
        println!("-- active rooms:");
        for room in rooms {
            match room.topic {
                Some(topic) => println!("   {}  ({topic})", room.name),
                None => println!("   {}", room.name),
            }
        }
    }
}

impl RoomWindows for TerminalUi {
    fn show_room(&mut self, spec: RoomWindowSpec) {
        let mut state = self.state();
        if !state.windows.contains(&spec.name) {
            state.windows.push(spec.name.clone());
        }
        state.current_room = Some(spec.name.clone());
        match spec.topic {
            Some(topic) => println!("== {} : {topic}", spec.name),
            None => println!("== {}", spec.name),
        }
    }

    fn append_room_event(&mut self, window_id: &str, message: &Value) -> bool {
        let state = self.state();
        let Some(room) = state
            .windows
            .iter()
            .find(|name| simplechat::ui::room_window_id(name) == window_id)
        else {
            return false;
        };
        println!("[{room}] {message}");
        true
    }
}

impl AlertSurface for TerminalUi {
    fn alert(&mut self, title: &str, message: &str) {
        println!("!! {title} {message}");
    }
}

impl RoomController for TerminalUi {
    fn handle_event(&mut self, event: RoomEvent) {
        let room = event.room.as_deref().unwrap_or("?");
        let raw = &event.raw;
        match event.kind.as_deref().unwrap_or("") {
            "said" => println!("[{room}] <{}> {}", text(raw, "nick"), text(raw, "body")),
            "joined" => println!("[{room}] * {} joined", text(raw, "nick")),
            "parted" => println!("[{room}] * {} left", text(raw, "nick")),
            _ => println!("[{room}] * {raw}"),
        }
    }
}

fn text<'a>(raw: &'a Value, field: &str) -> &'a str {
    raw.get(field).and_then(Value::as_str).unwrap_or("")
}

impl ConnectionObserver for TerminalUi {
    fn connected(&mut self, nickname: &str) {
        println!("-- connected as {nickname}");
    }

    fn disconnected(&mut self) {
        let mut state = self.state();
        state.windows.clear();
        state.current_room = None;
        println!("-- disconnected");
    }
}

// ---------------------------------------------------------------------------
// Nickname prompt
// ---------------------------------------------------------------------------

/// Reads the nickname from the next stdin line.
struct StdinPrompt<'a> {
    lines: &'a mut Lines<BufReader<Stdin>>,
}

impl NicknamePrompt for StdinPrompt<'_> {
    async fn request_nickname(&mut self) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(b"nickname: ").await;
        let _ = stdout.flush().await;
        self.lines.next_line().await.ok().flatten()
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

enum Flow {
    Continue,
    Quit,
}

async fn handle_line(
    client: &mut ChatClient,
    ui: &TerminalUi,
    lines: &mut Lines<BufReader<Stdin>>,
    line: &str,
) -> Result<Flow, SimpleChatError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Flow::Continue);
    }
    let Some(command) = line.strip_prefix('/') else {
        match ui.current_room() {
            Some(room) => client.say(&room, line)?,
            None => println!("-- join a room first (/join <room>)"),
        }
        return Ok(Flow::Continue);
    };

    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    match name {
        "connect" if rest.is_empty() => {
            let mut prompt = StdinPrompt { lines };
            let nickname = prompt.request_nickname().await.unwrap_or_default();
            client.connect(&nickname)?;
        }
        "connect" => client.connect(rest)?,
        "disconnect" => client.disconnect()?,
        "toggle" => client.toggle_connection(&mut StdinPrompt { lines }).await?,
        "join" if !rest.is_empty() => client.join(rest)?,
        "part" => {
            let room = if rest.is_empty() { ui.current_room() } else { Some(rest.to_string()) };
            match room {
                Some(room) => {
                    client.part(&room)?;
                    ui.forget_room(&room);
                }
                None => println!("-- not in a room"),
            }
        }
        "say" => match rest.split_once(' ') {
            Some((room, body)) => client.say(room, body.trim())?,
            None => println!("-- usage: /say <room> <text>"),
        },
        "list" => client.list_rooms()?,
        "quit" => return Ok(Flow::Quit),
        _ => println!("{HELP}"),
    }
    Ok(Flow::Continue)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(endpoint) => ClientConfig::new(endpoint),
        None => ClientConfig::default(),
    };
    tracing::info!(endpoint = %config.endpoint, "simplechat terminal client");
    println!("{HELP}");

    let ui = TerminalUi::default();
    let mut client = ChatClient::websocket(config, Collaborators::from_shared(ui.clone()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(&mut client, &ui, &mut lines, &line).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) => client.report(&e),
                }
            }
            Some(event) = client.next_event() => client.process(event),
        }
    }

    if client.state() == ConnectionState::Connected {
        client.disconnect()?;
        client.run_until_disconnected().await;
    }
    Ok(())
}
