//! `watch` command: run the module and forward resource edits.
//!
//! ```text
//! DirectorySource ──► host loop ──► EditBridge (document) ──► Host::notify
//!                         │     └──► Host::notify (other resources)
//!        Ctrl+C ──────────┘
//! ```
//!
//! The host and every watcher callback live on one current-thread runtime.

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::config::HostConfig;
use crate::host::{Delivery, EditBridge, Host, LogReporter, ResourceRegistry};
use crate::module::{Module, ShaderModule};
use crate::source::{DirectorySource, ResourceChange, SourceEvent};
use crate::{debug, log};

pub fn run_watch(config: &HostConfig) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(watch_loop(config))
}

async fn watch_loop(config: &HostConfig) -> Result<()> {
    let root = config.resource_root();
    let names = super::catalog_names(config)?;

    // Watcher before the first read: an edit in between is still seen
    let source = if config.watch.enable {
        Some(DirectorySource::new(root, names.iter().cloned(), config.watch.ignore_temp)?)
    } else {
        None
    };

    let registry = ResourceRegistry::load_from_dir(root, names.iter().cloned());
    let mut host = Host::new(registry, LogReporter).with_init_timeout(config.module.init_timeout());
    let mut module = ShaderModule::new();

    let Some(mut source) = source else {
        host.initialize(&mut module).await?;
        log!("watch"; "watching disabled, module initialized");
        return Ok(());
    };

    for name in &names {
        if let Some(content) = host.registry().content(name) {
            source.seed(name, content);
        }
    }

    if host.initialize(&mut module).await.is_err() {
        log!("module"; "start failed, retrying on the next resource change");
    }

    let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel::<()>();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;

    let mut bridge = EditBridge::new(config.bridge.document.clone());
    let mut events = source.spawn();
    log!(
        "watch";
        "watching {} resource(s) in {}",
        names.len(),
        root.display()
    );

    run_host(&mut host, &mut module, &mut bridge, &mut events, &mut shutdown_rx).await;

    log!("watch"; "stopped ({} document edit(s) forwarded)", bridge.changes_forwarded());
    Ok(())
}

/// Forward source events until shutdown or the source ends.
///
/// While the module has not started, each change is recorded and the start
/// is retried, so fixing a broken resource recovers without a restart.
async fn run_host<M: Module>(
    host: &mut Host,
    module: &mut M,
    bridge: &mut EditBridge,
    events: &mut mpsc::Receiver<SourceEvent>,
    shutdown: &mut mpsc::UnboundedReceiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            event = events.recv() => match event {
                Some(SourceEvent::Changed(change)) => {
                    forward(host, bridge, change);
                    if !host.is_running() {
                        // Failure is reported by the host
                        let _ = host.initialize(module).await;
                    }
                }
                Some(SourceEvent::Error(message)) => host.report(&message),
                None => break,
            },
        }
    }
}

/// Route one on-disk change: the bridged document goes through the edit
/// bridge, everything else straight to the host.
fn forward(host: &mut Host, bridge: &mut EditBridge, change: ResourceChange) -> Delivery {
    let ResourceChange { name, content } = change;

    let delivery = if name == bridge.resource() {
        match std::str::from_utf8(&content) {
            Ok(document) => bridge.document_changed(host, document),
            Err(_) => {
                host.report(&format!("`{name}` is not UTF-8, forwarding raw bytes"));
                host.notify(&name, &content)
            }
        }
    } else {
        host.notify(&name, &content)
    };

    debug!("watch"; "{}: {:?}", name, delivery);
    delivery
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn change(name: &str, content: &[u8]) -> ResourceChange {
        ResourceChange {
            name: name.to_string(),
            content: content.to_vec(),
        }
    }

    #[test]
    fn test_forward_routes_document_through_bridge() {
        let mut host = Host::new(
            ResourceRegistry::from_names(["nuero.png", "shader.wgsl"]),
            |_: &str| {},
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        for name in ["nuero.png", "shader.wgsl"] {
            let sink = Rc::clone(&seen);
            host.watch(name, move |name, content| {
                sink.borrow_mut().push((name.to_string(), content.len()));
                Ok(())
            });
        }
        let mut bridge = EditBridge::new("shader.wgsl");

        forward(&mut host, &mut bridge, change("shader.wgsl", b"fn vs_main"));
        forward(&mut host, &mut bridge, change("nuero.png", b"png"));

        assert_eq!(bridge.changes_forwarded(), 1);
        assert_eq!(
            *seen.borrow(),
            vec![("shader.wgsl".to_string(), 10), ("nuero.png".to_string(), 3)]
        );
    }

    #[test]
    fn test_forward_non_utf8_document_reported_and_delivered() {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reports);
        let mut host = Host::new(
            ResourceRegistry::from_names(["shader.wgsl"]),
            move |m: &str| sink.borrow_mut().push(m.to_string()),
        );
        host.watch("shader.wgsl", |_, _| Ok(()));
        let mut bridge = EditBridge::new("shader.wgsl");

        let delivery = forward(&mut host, &mut bridge, change("shader.wgsl", &[0xff, 0x00]));

        assert_eq!(delivery, Delivery::Delivered);
        assert_eq!(bridge.changes_forwarded(), 0);
        assert!(reports.borrow()[0].contains("not UTF-8"));
    }

    /// Watches the shader; fails its first `failures` starts.
    struct FlakyModule {
        failures: usize,
        attempts: usize,
        seen: Rc<RefCell<Vec<Vec<u8>>>>,
    }

    impl FlakyModule {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                attempts: 0,
                seen: Rc::default(),
            }
        }
    }

    impl Module for FlakyModule {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn start(&mut self, host: &mut Host) -> anyhow::Result<()> {
            self.attempts += 1;
            let seen = Rc::clone(&self.seen);
            host.watch("shader.wgsl", move |_, content| {
                seen.borrow_mut().push(content.to_vec());
                Ok(())
            });
            if self.attempts <= self.failures {
                anyhow::bail!("device lost");
            }
            Ok(())
        }
    }

    async fn run_with_changes<M: Module>(
        host: &mut Host,
        module: &mut M,
        contents: &[&str],
    ) -> EditBridge {
        let (tx, mut events) = mpsc::channel(16);
        for content in contents {
            tx.send(SourceEvent::Changed(change("shader.wgsl", content.as_bytes())))
                .await
                .unwrap();
        }
        tx.send(SourceEvent::Error("watch error: overflow".to_string()))
            .await
            .unwrap();
        drop(tx);

        let (_shutdown_tx, mut shutdown) = mpsc::unbounded_channel();
        let mut bridge = EditBridge::new("shader.wgsl");
        run_host(host, module, &mut bridge, &mut events, &mut shutdown).await;
        bridge
    }

    fn reporting_host() -> (Host, Rc<RefCell<Vec<String>>>) {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reports);
        let host = Host::new(
            ResourceRegistry::from_names(["shader.wgsl"]),
            move |m: &str| sink.borrow_mut().push(m.to_string()),
        );
        (host, reports)
    }

    #[tokio::test]
    async fn test_failed_start_retried_on_next_change() {
        let (mut host, reports) = reporting_host();
        let mut module = FlakyModule::new(1);
        assert!(host.initialize(&mut module).await.is_err());

        let bridge = run_with_changes(&mut host, &mut module, &["v1", "v2"]).await;

        assert!(host.is_running());
        assert_eq!(module.attempts, 2);
        // v1 arrived before the retry, v2 after it
        assert_eq!(*module.seen.borrow(), vec![b"v2".to_vec()]);
        assert_eq!(host.registry().content("shader.wgsl"), Some(&b"v2"[..]));
        assert_eq!(bridge.changes_forwarded(), 2);
        assert_eq!(
            *reports.borrow(),
            vec![
                "module `flaky` failed to initialize: device lost".to_string(),
                "watch error: overflow".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_loop_survives_repeated_start_failures() {
        let (mut host, reports) = reporting_host();
        let mut module = FlakyModule::new(usize::MAX);
        assert!(host.initialize(&mut module).await.is_err());

        run_with_changes(&mut host, &mut module, &["v1", "v2"]).await;

        assert!(!host.is_running());
        assert_eq!(module.attempts, 3);
        assert!(module.seen.borrow().is_empty());
        assert_eq!(reports.borrow().len(), 4);
        assert_eq!(reports.borrow()[3], "watch error: overflow");
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let (mut host, _) = reporting_host();
        let mut module = FlakyModule::new(0);
        host.initialize(&mut module).await.unwrap();

        let (_tx, mut events) = mpsc::channel::<SourceEvent>(1);
        let (shutdown_tx, mut shutdown) = mpsc::unbounded_channel();
        shutdown_tx.send(()).unwrap();
        let mut bridge = EditBridge::new("shader.wgsl");

        run_host(&mut host, &mut module, &mut bridge, &mut events, &mut shutdown).await;

        assert!(host.is_running());
        assert_eq!(bridge.changes_forwarded(), 0);
    }
}
