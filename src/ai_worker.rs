use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::ai::{parse_new_example, parse_word_details, OpenRouterClient};
use crate::error::GlosorError;
use crate::logger;
use crate::models::{AiRequest, AiResponse};

/// Runs AI lookups off the UI thread. Requests come in over `ai_rx`,
/// responses go back over `ai_tx`. Any transport or parse failure is
/// reported as one generic service-unavailable message; details only
/// go to the debug log.
pub fn spawn_ai_worker(
    source_language: String,
    target_language: String,
    ai_tx: Sender<AiResponse>,
    ai_rx: Receiver<AiRequest>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("glosor::ai_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    logger::log(&format!("Failed to create worker runtime: {}", e));
                    let _ = ai_tx.send(AiResponse::Failed {
                        message: GlosorError::AiUnavailable.to_string(),
                    });
                    return;
                }
            };

            loop {
                let request = match ai_rx.recv() {
                    Ok(request) => request,
                    Err(_) => {
                        logger::log("Worker channel disconnected, exiting");
                        break;
                    }
                };

                let client = match OpenRouterClient::new(&source_language, &target_language) {
                    Ok(client) => client,
                    Err(e) => {
                        logger::log(&format!("Failed to create AI client: {}", e));
                        let _ = ai_tx.send(AiResponse::Failed {
                            message: GlosorError::AiUnavailable.to_string(),
                        });
                        continue;
                    }
                };

                let response = match request {
                    AiRequest::WordDetails { word } => {
                        logger::log(&format!("Worker fetching details for \"{}\"", word));
                        let result = rt.block_on(client.word_details(&word));
                        match result.map_err(|e| e.to_string()).and_then(|raw| {
                            logger::log(&format!("Raw word details response: {}", raw));
                            parse_word_details(&raw)
                        }) {
                            Ok(entries) => AiResponse::WordDetails { word, entries },
                            Err(e) => {
                                logger::log(&format!("Word details failed: {}", e));
                                AiResponse::Failed {
                                    message: GlosorError::AiUnavailable.to_string(),
                                }
                            }
                        }
                    }
                    AiRequest::NewExample {
                        word_id,
                        word,
                        existing,
                    } => {
                        logger::log(&format!("Worker fetching new example for \"{}\"", word));
                        let result = rt.block_on(client.new_example(&word, &existing));
                        match result.map_err(|e| e.to_string()).and_then(|raw| {
                            logger::log(&format!("Raw example response: {}", raw));
                            parse_new_example(&raw)
                        }) {
                            Ok(example) => AiResponse::NewExample { word_id, example },
                            Err(e) => {
                                logger::log(&format!("New example failed: {}", e));
                                AiResponse::Failed {
                                    message: GlosorError::AiUnavailable.to_string(),
                                }
                            }
                        }
                    }
                };

                let _ = ai_tx.send(response);
            }
        })
        .expect("Failed to spawn AI worker thread")
}
