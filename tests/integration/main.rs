//! Integration tests for the sops buildpack CLI

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn buildpack() -> Command {
        cargo_bin_cmd!("sops-buildpack")
    }

    #[test]
    fn help_displays() {
        buildpack()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("sops buildpack"));
    }

    #[test]
    fn version_displays() {
        buildpack()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("sops-buildpack"));
    }

    #[test]
    fn compile_help() {
        buildpack()
            .args(["compile", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Install sops into the build directory"));
    }

    #[test]
    fn detect_prints_buildpack_name() {
        buildpack()
            .args(["detect", "/app"])
            .assert()
            .success()
            .stdout("sops\n");
    }

    #[test]
    fn release_prints_empty_manifest() {
        buildpack()
            .args(["release", "/app"])
            .assert()
            .success()
            .stdout("--- {}\n");
    }
}

mod compile_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::sync::mpsc;
    use std::thread;
    use tempfile::TempDir;

    const FAKE_BINARY: &[u8] = b"\x7fELF fake sops binary";

    fn buildpack() -> Command {
        cargo_bin_cmd!("sops-buildpack")
    }

    /// Serve `conns` HTTP responses on a loopback port, then stop listening.
    /// Request paths are reported through the returned receiver.
    fn serve(
        status: &'static str,
        body: Vec<u8>,
        conns: usize,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for _ in 0..conns {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("")
                    .to_string();
                tx.send(path).ok();
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap_or(0) > 0 {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                let header = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(header.as_bytes()).unwrap();
                stream.write_all(&body).unwrap();
            }
        });
        (format!("http://{addr}"), rx)
    }

    fn is_executable(path: &Path) -> bool {
        std::fs::metadata(path).unwrap().permissions().mode() & 0o111 != 0
    }

    fn dir_is_empty(path: &Path) -> bool {
        std::fs::read_dir(path).unwrap().next().is_none()
    }

    #[test]
    fn surplus_arguments_use_derived_exit_code() {
        let temp = TempDir::new().unwrap();
        let build = temp.path().join("build");
        let cache = temp.path().join("cache");
        let env = temp.path().join("env");

        buildpack()
            .arg("compile")
            .args([&build, &cache, &env, &temp.path().join("surplus")])
            .assert()
            .failure()
            .code(6)
            .stderr(predicate::str::contains("received 4 arguments"));

        // No side effects: none of the directories were even created
        assert!(!build.exists());
        assert!(!cache.exists());
        assert!(!env.exists());

        // The code tracks the count, not a fixed value
        buildpack()
            .arg("compile")
            .args(["a", "b", "c", "d", "e"])
            .assert()
            .failure()
            .code(7);
    }

    #[test]
    fn missing_config_var_exits_one_without_artifacts() {
        let build = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let env = TempDir::new().unwrap();

        buildpack()
            .arg("compile")
            .args([build.path(), cache.path(), env.path()])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("SOPS_VERSION"))
            .stderr(predicate::str::contains("heroku config:set"));

        assert!(dir_is_empty(cache.path()));
        assert!(!build.path().join(".sops-buildpack").exists());
        assert!(!build.path().join(".profile.d").exists());
    }

    #[test]
    fn absent_env_dir_proceeds_past_config_stage() {
        let build = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();

        buildpack()
            .arg("compile")
            .args([
                build.path(),
                cache.path(),
                &build.path().join("no-such-env-dir"),
            ])
            .assert()
            .failure()
            .code(1)
            // The config stage is tolerant; the install stage is what fails
            .stdout(predicate::str::contains("Beginning sops install, or cache lookup"))
            .stderr(predicate::str::contains("SOPS_VERSION"));
    }

    #[test]
    fn end_to_end_install_cache_and_profile() {
        let (base, paths) = serve("200 OK", FAKE_BINARY.to_vec(), 1);
        let build = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let env = TempDir::new().unwrap();
        std::fs::write(env.path().join("SOPS_VERSION"), "3.7.1\n").unwrap();
        std::fs::write(
            env.path().join("SOPS_DOWNLOAD_URL"),
            format!("{base}/releases/sops-{{version}}.linux"),
        )
        .unwrap();

        buildpack()
            .arg("compile")
            .args([build.path(), cache.path(), env.path()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Parsing expected arguments"))
            .stdout(predicate::str::contains(
                "Processing required environment configuration",
            ))
            .stdout(predicate::str::contains("Beginning sops install, or cache lookup"))
            .stdout(predicate::str::contains("Downloading sops 3.7.1"))
            .stdout(predicate::str::contains("Preparing environment for compatibility"))
            .stdout(predicate::str::contains("sops 3.7.1 installed"));

        // The artifact was requested at the version-templated path
        assert_eq!(paths.recv().unwrap(), "/releases/sops-3.7.1.linux");

        let entry = cache.path().join("sops_3.7.1");
        assert!(entry.exists());
        assert!(is_executable(&entry));
        assert!(cache.path().join("sops_3.7.1.json").exists());

        let installed = build.path().join(".sops-buildpack/sops");
        assert!(is_executable(&installed));
        assert_eq!(
            std::fs::read(&entry).unwrap(),
            std::fs::read(&installed).unwrap()
        );

        let profile =
            std::fs::read_to_string(build.path().join(".profile.d/sops.sh")).unwrap();
        assert_eq!(
            profile.matches(r#"export PATH="$PATH:$HOME/.sops-buildpack/""#).count(),
            1
        );

        // Second build: the server accepts no more connections, so success
        // means the cache satisfied the install without a transfer
        buildpack()
            .arg("compile")
            .args([build.path(), cache.path(), env.path()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Using cached sops 3.7.1"));

        let profile =
            std::fs::read_to_string(build.path().join(".profile.d/sops.sh")).unwrap();
        assert_eq!(
            profile.matches(r#"export PATH="$PATH:$HOME/.sops-buildpack/""#).count(),
            1
        );
    }

    #[test]
    fn fetch_failure_fails_run_and_leaves_cache_clean() {
        let (base, _paths) = serve("404 Not Found", b"missing".to_vec(), 1);
        let build = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let env = TempDir::new().unwrap();
        std::fs::write(env.path().join("SOPS_VERSION"), "9.9.9").unwrap();
        std::fs::write(
            env.path().join("SOPS_DOWNLOAD_URL"),
            format!("{base}/releases/sops-{{version}}.linux"),
        )
        .unwrap();

        buildpack()
            .arg("compile")
            .args([build.path(), cache.path(), env.path()])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("failed to download"));

        // Nothing committed to the cache, no partial left behind
        assert!(dir_is_empty(cache.path()));
        assert!(!build.path().join(".sops-buildpack").exists());
    }
}
