//! End-to-end session tests on virtual time.

use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hackterm::effects::{LinkError, LinkOpener, Links};
use hackterm::input::{self, InputEvent, InputSender};
use hackterm::player::{MessageStyle, Pacer};
use hackterm::screen::{Screen, SharedScreen};
use hackterm::session::{BootStage, BootTimings, Collaborators, LoopExit, Session};
use hackterm::shell::load_or_fallback;
use tempfile::TempDir;

const DOC: &str = r#"{
    "site": "zion",
    "commands": {
        "whoami": { "description": "Display current user", "type": "info", "response": "neo" },
        "blog":   { "description": "Open the blog", "type": "redirect",
                    "message": "Redirecting to blog...", "url": "https://example.com/blog" },
        "exit":   { "description": "Log out", "type": "function" }
    }
}"#;

#[derive(Default)]
struct RecordingLinks {
    opened: Mutex<Vec<String>>,
}

impl LinkOpener for RecordingLinks {
    fn open(&self, url: &str) -> Result<(), LinkError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

fn session_for(dir: &TempDir, links: Links) -> (Session, SharedScreen) {
    let path = dir.path().join("config.json");
    fs::write(&path, DOC).unwrap();
    let screen = Screen::new("neo@zion:~$ ", 200).shared();
    let session = Session::new(
        screen.clone(),
        load_or_fallback(&path),
        Collaborators {
            links,
            ..Collaborators::default()
        },
        Pacer::default(),
        BootTimings::default(),
    );
    (session, screen)
}

async fn wait_for_input(screen: &SharedScreen) {
    while !screen.lock().input_visible() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn type_line(tx: &InputSender, screen: &SharedScreen, line: &str) {
    wait_for_input(screen).await;
    for c in line.chars() {
        tx.send(InputEvent::Char(c)).unwrap();
    }
    tx.send(InputEvent::Enter).unwrap();
    // Let the loop pick the line up before polling for the input again
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn texts(screen: &SharedScreen) -> Vec<(MessageStyle, String)> {
    screen
        .lock()
        .entries()
        .map(|e| (e.style, e.text.clone()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn key_press_boots_then_commands_run() {
    let dir = TempDir::new().unwrap();
    let (session, screen) = session_for(&dir, Links::none());
    assert_eq!(screen.lock().banner.title, "WELCOME TO ZION");

    let (tx, mut rx) = input::channel();
    let user = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(InputEvent::Click).unwrap();
        session.flags().wait_completed().await;
        type_line(&tx, &screen, "WhoAmI").await;
        type_line(&tx, &screen, "nope").await;
        type_line(&tx, &screen, "exit").await;
    };

    let (exit, ()) = tokio::join!(session.run(&mut rx), user);

    assert_eq!(exit, Ok(LoopExit::Exited));
    assert_eq!(session.boot().stage(), BootStage::Interactive);
    let entries = texts(&screen);
    // 8 initial + 6 system lines come first
    assert_eq!(entries.len(), 14 + 2 + 3 + 3);
    assert_eq!(
        entries[14..],
        [
            (MessageStyle::Prompt, "neo@zion:~$ whoami".to_string()),
            (MessageStyle::Success, "neo".to_string()),
            (MessageStyle::Prompt, "neo@zion:~$ nope".to_string()),
            (MessageStyle::Error, "Command not found: nope".to_string()),
            (
                MessageStyle::Info,
                "Type \"help\" to see available commands".to_string()
            ),
            (MessageStyle::Prompt, "neo@zion:~$ exit".to_string()),
            (MessageStyle::Info, "Logging out...".to_string()),
            (MessageStyle::Success, "Goodbye, hacker!".to_string()),
        ]
    );
    assert!(screen.lock().terminated);
}

#[tokio::test(start_paused = true)]
async fn redirect_opens_link_after_message() {
    let dir = TempDir::new().unwrap();
    let opener = Arc::new(RecordingLinks::default());
    let (session, screen) = session_for(&dir, Links::new(opener.clone()));

    let (tx, mut rx) = input::channel();
    let user = async {
        tx.send(InputEvent::Char(' ')).unwrap();
        session.flags().wait_completed().await;
        type_line(&tx, &screen, "blog").await;
        wait_for_input(&screen).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(tx);
    };

    let (exit, ()) = tokio::join!(session.run(&mut rx), user);

    assert_eq!(exit, Ok(LoopExit::InputClosed));
    assert_eq!(
        *opener.opened.lock().unwrap(),
        vec!["https://example.com/blog".to_string()]
    );
    let entries = texts(&screen);
    assert!(entries.contains(&(MessageStyle::Info, "Redirecting to blog...".to_string())));
    assert!(entries.contains(&(MessageStyle::Success, "Open the blog".to_string())));
}

#[tokio::test(start_paused = true)]
async fn without_input_the_fallback_path_boots() {
    let dir = TempDir::new().unwrap();
    let (session, screen) = session_for(&dir, Links::none());

    let (tx, mut rx) = input::channel();
    let user = async {
        session.flags().wait_completed().await;
        drop(tx);
    };

    let (exit, ()) = tokio::join!(session.run(&mut rx), user);

    assert_eq!(exit, Ok(LoopExit::InputClosed));
    let screen = screen.lock();
    assert!(!screen.boot.visible);
    // 4 fallback lines
    assert_eq!(screen.len(), 4);
}
