use crate::config::{ChannelPaths, HookConfig};
use crate::event::EventClassifier;
use crate::ipc::socket_client::EventTransport;
use crate::security::{self, verify_endpoint};

/// Print where the channel lives and whether the reporter would use it.
pub fn run_status(paths: Option<&ChannelPaths>) {
    let Some(paths) = paths else {
        println!("channel directory: unresolved (no home directory)");
        return;
    };

    let uid = security::effective_uid();
    println!("channel directory: {}", paths.base_dir.display());
    println!("effective uid:     {}", uid);

    match verify_endpoint(&paths.endpoint()) {
        Ok(()) => println!("socket:            ok ({})", paths.socket_path.display()),
        Err(rejection) => println!("socket:            unavailable ({})", rejection),
    }

    match security::read_credential(&paths.credential_path, uid) {
        Some(_) => println!("credential:        ok"),
        None => println!(
            "credential:        unavailable ({} missing, empty, or not owner-only)",
            paths.credential_path.display()
        ),
    }

    match HookConfig::load_from(&paths.config_path, uid) {
        Ok(config) => {
            let transport = EventTransport::from_config(paths.endpoint(), &config);
            let classifier = EventClassifier::from_config(&config);
            println!(
                "request timeout:   {}s",
                transport.request_timeout().as_secs()
            );
            println!(
                "suppressed:        {}",
                classifier.suppressed_notifications().join(", ")
            );
        }
        Err(e) => println!("config:            ignored ({})", e),
    }
}
