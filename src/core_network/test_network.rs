// End-to-end tests over loopback sockets

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::core_vfs::{DeviceManager, DirectoryDevices};
    use crate::server::{Server, ServerState};
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(10);

    struct TestServer {
        addr: SocketAddr,
        state: Arc<ServerState>,
        handle: JoinHandle<anyhow::Result<()>>,
        cards: Vec<TempDir>,
    }

    impl TestServer {
        fn card(&self, index: usize) -> PathBuf {
            self.cards[index].path().to_path_buf()
        }
    }

    /// Serves `/carda` and `/cardb` from temporary directories.
    async fn start_server(pasv_port_start: u16, configure: impl FnOnce(&mut Config)) -> TestServer {
        let cards = vec![tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap()];
        let devices = Arc::new(DirectoryDevices::new());
        devices.add("Card A", "/carda", &cards[0].path().display().to_string(), false);
        devices.add("Card B", "/cardb", &cards[1].path().display().to_string(), false);
        assert!(devices.mount("/carda"));
        assert!(devices.mount("/cardb"));

        let mut config = Config::default();
        config.server.listen_address = "127.0.0.1".to_string();
        config.server.listen_port = 0;
        config.server.data_source_port = 0;
        config.server.pasv_port_start = pasv_port_start;
        configure(&mut config);

        let server = Server::bind(config, devices).await.unwrap();
        let addr = server.local_addr().unwrap();
        let state = server.state();
        let handle = tokio::spawn(server.run());
        TestServer {
            addr,
            state,
            handle,
            cards,
        }
    }

    struct Client {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    impl Client {
        async fn connect(addr: SocketAddr) -> Self {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (reader, writer) = stream.into_split();
            Self {
                reader: BufReader::new(reader),
                writer,
            }
        }

        /// Connects and checks the greeting.
        async fn greeted(addr: SocketAddr) -> Self {
            let mut client = Self::connect(addr).await;
            assert_eq!(client.reply().await, "220 mountftpd");
            client
        }

        async fn logged_in(addr: SocketAddr) -> Self {
            let mut client = Self::greeted(addr).await;
            assert!(client.command("USER anonymous").await.starts_with("331 "));
            assert_eq!(client.command("PASS guest").await, "230 User logged in, proceed.");
            client
        }

        async fn send(&mut self, line: &str) {
            self.writer
                .write_all(format!("{}\r\n", line).as_bytes())
                .await
                .unwrap();
        }

        async fn reply(&mut self) -> String {
            let mut line = String::new();
            let n = timeout(WAIT, self.reader.read_line(&mut line))
                .await
                .expect("timed out waiting for a reply")
                .unwrap();
            assert!(n > 0, "connection closed while waiting for a reply");
            assert!(line.ends_with("\r\n"), "reply not terminated by CRLF: {:?}", line);
            line.trim_end_matches("\r\n").to_string()
        }

        async fn command(&mut self, line: &str) -> String {
            self.send(line).await;
            self.reply().await
        }

        /// True once the server has closed the connection without sending
        /// anything else.
        async fn is_closed(&mut self) -> bool {
            let mut rest = Vec::new();
            match timeout(WAIT, self.reader.read_to_end(&mut rest)).await {
                Ok(Ok(_)) => rest.is_empty(),
                Ok(Err(_)) => true,
                Err(_) => false,
            }
        }

        async fn pasv(&mut self) -> SocketAddr {
            let reply = self.command("PASV").await;
            parse_pasv_reply(&reply)
        }
    }

    fn parse_pasv_reply(reply: &str) -> SocketAddr {
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        let start = reply.find('(').unwrap() + 1;
        let end = reply.find(')').unwrap();
        let numbers: Vec<u16> = reply[start..end]
            .split(',')
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(numbers.len(), 6);
        let ip = std::net::Ipv4Addr::new(
            numbers[0] as u8,
            numbers[1] as u8,
            numbers[2] as u8,
            numbers[3] as u8,
        );
        SocketAddr::from((ip, (numbers[4] << 8) | numbers[5]))
    }

    async fn read_all(mut stream: TcpStream) -> String {
        let mut received = String::new();
        timeout(WAIT, stream.read_to_string(&mut received))
            .await
            .unwrap()
            .unwrap();
        received
    }

    #[tokio::test]
    async fn test_login_and_directory_commands() {
        let server = start_server(47100, |config| {
            config.server.password = Some("secret".to_string());
        })
        .await;
        let mut client = Client::greeted(server.addr).await;

        assert_eq!(client.command("NOOP").await, "200 NOOP command successful.");
        assert_eq!(client.command("PWD").await, "530 Please login with USER and PASS.");
        assert_eq!(client.command("USER anonymous").await, "331 User name okay, need password.");
        assert_eq!(client.command("PASS wrong").await, "530 Login incorrect.");
        assert_eq!(client.command("pass secret").await, "230 User logged in, proceed.");

        assert_eq!(client.command("PWD").await, "257 \"/\" is current directory.");
        assert_eq!(client.command("SYST").await, "215 UNIX Type: L8 Version: mountftpd");
        assert_eq!(client.command("TYPE I").await, "200 Type set to I.");
        assert_eq!(client.command("TYPE X").await, "501 Syntax error in parameters.");
        assert_eq!(client.command("MODE S").await, "200 Mode S ok.");
        assert_eq!(client.command("CWD /carda").await, "250 CWD command successful.");
        assert_eq!(client.command("MKD sub").await, "257 \"/carda/sub\" directory created.");
        assert!(server.card(0).join("sub").is_dir());
        assert_eq!(client.command("MKD").await, "501 Syntax error in parameters.");
        assert_eq!(client.command("CWD sub").await, "250 CWD command successful.");
        assert_eq!(client.command("PWD").await, "257 \"/carda/sub\" is current directory.");
        assert_eq!(client.command("CDUP").await, "250 CDUP command successful.");
        assert_eq!(client.command("PWD").await, "257 \"/carda\" is current directory.");
        assert!(client.command("CWD /nowhere").await.starts_with("550 "));
        assert!(client.command("MKD /").await.starts_with("550 "));

        assert_eq!(client.command("RNTO other").await, "503 RNFR required first.");
        assert_eq!(client.command("RNFR sub").await, "350 Ready for RNTO.");
        assert_eq!(client.command("CWD /").await, "250 CWD command successful.");
        assert_eq!(client.command("RNTO /carda/renamed").await, "250 Rename successful.");
        assert!(server.card(0).join("renamed").is_dir());
        assert_eq!(client.command("RNTO again").await, "503 RNFR required first.");
        assert_eq!(client.command("RMD /carda/renamed").await, "250 Directory removed.");

        assert_eq!(client.command("FEAT").await, "502 Command not implemented.");
        assert_eq!(
            client.command("ALLO 100").await,
            "202 Command not implemented, superfluous at this site."
        );
        assert_eq!(client.command("REST abc").await, "501 Syntax error in parameters.");

        assert_eq!(client.command("REIN").await, "220 Service ready for new user.");
        assert_eq!(client.command("PWD").await, "530 Please login with USER and PASS.");
        assert_eq!(client.command("QUIT").await, "221 Service closing control connection.");
        assert!(client.is_closed().await);
    }

    #[tokio::test]
    async fn test_store_then_size() {
        let server = start_server(47300, |_| {}).await;
        let mut client = Client::logged_in(server.addr).await;
        assert_eq!(client.command("CWD /carda").await, "250 CWD command successful.");

        let data_addr = client.pasv().await;
        assert_eq!(client.command("STOR file.txt").await, "150 Transferring data.");
        let mut data = TcpStream::connect(data_addr).await.unwrap();
        data.write_all(b"hi").await.unwrap();
        data.shutdown().await.unwrap();
        drop(data);
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");

        assert_eq!(client.command("SIZE file.txt").await, "213 2");
        assert_eq!(std::fs::read(server.card(0).join("file.txt")).unwrap(), b"hi");

        // The passive listener serves the next transfer as well.
        assert_eq!(client.command("APPE file.txt").await, "150 Transferring data.");
        let mut data = TcpStream::connect(data_addr).await.unwrap();
        data.write_all(b"!").await.unwrap();
        drop(data);
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");
        assert_eq!(client.command("SIZE /carda/file.txt").await, "213 3");

        assert_eq!(client.command("DELE file.txt").await, "250 File or directory removed.");
        assert!(client.command("SIZE file.txt").await.starts_with("550 "));
    }

    #[tokio::test]
    async fn test_retr_resumes_from_restart_marker() {
        let server = start_server(47500, |_| {}).await;
        std::fs::write(server.card(1).join("greeting.txt"), "hello world").unwrap();
        let mut client = Client::logged_in(server.addr).await;

        let data_addr = client.pasv().await;
        assert_eq!(client.command("REST 6").await, "350 Restart position accepted (6).");
        assert_eq!(client.command("RETR /cardb/greeting.txt").await, "150 Transferring data.");
        let data = TcpStream::connect(data_addr).await.unwrap();
        assert_eq!(read_all(data).await, "world");
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");

        // The marker applies once.
        assert_eq!(client.command("RETR /cardb/greeting.txt").await, "150 Transferring data.");
        let data = TcpStream::connect(data_addr).await.unwrap();
        assert_eq!(read_all(data).await, "hello world");
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");

        assert!(client.command("RETR /cardb/missing.txt").await.starts_with("550 "));
    }

    #[tokio::test]
    async fn test_stor_resumes_from_restart_marker() {
        let server = start_server(49100, |_| {}).await;
        let target = server.card(0).join("resume.txt");
        std::fs::write(&target, "hello world").unwrap();
        let mut client = Client::logged_in(server.addr).await;
        assert_eq!(client.command("CWD /carda").await, "250 CWD command successful.");
        let data_addr = client.pasv().await;

        assert_eq!(client.command("REST 6").await, "350 Restart position accepted (6).");
        assert_eq!(client.command("STOR resume.txt").await, "150 Transferring data.");
        let mut data = TcpStream::connect(data_addr).await.unwrap();
        data.write_all(b"WORLD").await.unwrap();
        drop(data);
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello WORLD");

        // The marker was consumed: RETR starts from the beginning.
        assert_eq!(client.command("RETR resume.txt").await, "150 Transferring data.");
        let data = TcpStream::connect(data_addr).await.unwrap();
        assert_eq!(read_all(data).await, "hello WORLD");
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");

        // Without a marker the file is truncated.
        assert_eq!(client.command("STOR resume.txt").await, "150 Transferring data.");
        let mut data = TcpStream::connect(data_addr).await.unwrap();
        data.write_all(b"abc").await.unwrap();
        drop(data);
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "abc");
        assert_eq!(client.command("SIZE resume.txt").await, "213 3");
    }

    #[tokio::test]
    async fn test_root_listing_follows_mounts() {
        let server = start_server(47700, |_| {}).await;
        let mut client = Client::logged_in(server.addr).await;

        let data_addr = client.pasv().await;
        assert_eq!(client.command("NLST").await, "150 Transferring data.");
        let data = TcpStream::connect(data_addr).await.unwrap();
        assert_eq!(read_all(data).await, "carda\r\ncardb\r\n");
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");

        assert_eq!(client.command("SITE UNMOUNT /cardb").await, "250 Unmounted.");
        assert_eq!(client.command("SITE UNMOUNT /cardb").await, "550 Unable to unmount.");

        let data_addr = client.pasv().await;
        assert_eq!(client.command("LIST -la").await, "150 Transferring data.");
        let data = TcpStream::connect(data_addr).await.unwrap();
        let listing = read_all(data).await;
        assert_eq!(listing.lines().count(), 1);
        assert!(listing.starts_with("drwxr-xr-x    1 0        0                 0 "));
        assert!(listing.ends_with(" carda\r\n"));
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");
        assert!(client.command("CWD /cardb").await.starts_with("550 "));

        assert_eq!(client.command("site mount cardb").await, "250 Mounted.");
        assert_eq!(client.command("CWD /cardb").await, "250 CWD command successful.");
        assert_eq!(client.command("SITE CHMOD 755 x").await, "250 SITE CHMOD command ok.");
        assert_eq!(client.command("SITE BOGUS").await, "501 Unknown SITE command.");
    }

    #[tokio::test]
    async fn test_active_mode_transfer() {
        let server = start_server(47900, |_| {}).await;
        std::fs::write(server.card(0).join("a.txt"), "x").unwrap();
        let mut client = Client::logged_in(server.addr).await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let port_command = format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xff);
        assert_eq!(client.command(&port_command).await, "200 PORT command successful.");
        assert_eq!(client.command("PORT 1,2,3").await, "501 Syntax error in parameters.");

        assert_eq!(client.command("NLST /carda").await, "150 Transferring data.");
        let (data, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
        assert_eq!(read_all(data).await, "a.txt\r\n");
        assert_eq!(client.reply().await, "226 Closing data connection, transfer successful.");
    }

    #[tokio::test]
    async fn test_data_connection_deadline() {
        let server = start_server(48100, |config| {
            config.server.data_timeout_secs = 1;
        })
        .await;
        let mut client = Client::logged_in(server.addr).await;

        client.pasv().await;
        let started = Instant::now();
        assert_eq!(client.command("LIST").await, "150 Transferring data.");
        assert_eq!(
            client.reply().await,
            "520 Closing data connection, error occurred during transfer."
        );
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(1), "closed too early: {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(4), "closed too late: {:?}", elapsed);

        // The session is still usable.
        assert_eq!(client.command("NOOP").await, "200 NOOP command successful.");
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let server = start_server(48300, |config| {
            config.server.max_clients = 2;
        })
        .await;
        let mut first = Client::greeted(server.addr).await;
        let mut second = Client::greeted(server.addr).await;

        let mut third = Client::connect(server.addr).await;
        assert!(third.is_closed().await);

        assert_eq!(first.command("NOOP").await, "200 NOOP command successful.");
        assert_eq!(second.command("NOOP").await, "200 NOOP command successful.");

        assert_eq!(first.command("QUIT").await, "221 Service closing control connection.");
        assert!(first.is_closed().await);
        // The slot is released with the session.
        let mut retry = None;
        for _ in 0..50 {
            let mut client = Client::connect(server.addr).await;
            let mut line = String::new();
            if let Ok(Ok(n)) = timeout(WAIT, client.reader.read_line(&mut line)).await {
                if n > 0 {
                    assert_eq!(line, "220 mountftpd\r\n");
                    retry = Some(client);
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(retry.is_some());
        assert!(server.state.sessions.len() <= 2);
    }

    #[tokio::test]
    async fn test_protocol_violations_close_connection() {
        let server = start_server(48500, |_| {}).await;

        let mut client = Client::greeted(server.addr).await;
        client.writer.write_all(b"NO\0OP\r\n").await.unwrap();
        assert!(client.is_closed().await);

        let mut client = Client::greeted(server.addr).await;
        client.writer.write_all(b"NOOP\nPWD\r\n").await.unwrap();
        assert!(client.is_closed().await);

        let mut client = Client::greeted(server.addr).await;
        client.writer.write_all(&[b'A'; 1100]).await.unwrap();
        assert!(client.is_closed().await);

        // Pipelined lines are answered in order.
        let mut client = Client::greeted(server.addr).await;
        client.writer.write_all(b"NOOP\r\n\r\nUSER x\r\n").await.unwrap();
        assert_eq!(client.reply().await, "200 NOOP command successful.");
        assert_eq!(client.reply().await, "331 User name okay, need password.");
    }

    #[tokio::test]
    async fn test_site_loader_stops_the_server() {
        let server = start_server(48700, |_| {}).await;
        let mut admin = Client::logged_in(server.addr).await;
        let mut other = Client::greeted(server.addr).await;

        assert_eq!(admin.command("SITE PASSWD hunter2").await, "200 Password changed.");
        assert!(server.state.check_password("hunter2"));
        assert!(!server.state.check_password("guess"));
        assert_eq!(admin.command("SITE NOPASSWD").await, "200 Authentication disabled.");
        assert!(server.state.check_password("guess"));

        assert_eq!(admin.command("SITE LOADER").await, "200 Exiting to loader.");
        assert_eq!(
            admin.reply().await,
            "421 Service not available, closing control connection."
        );
        assert_eq!(
            other.reply().await,
            "421 Service not available, closing control connection."
        );

        timeout(WAIT, server.handle).await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_does_not_wait_for_stalled_client() {
        let server = start_server(48900, |_| {}).await;
        let mut admin = Client::logged_in(server.addr).await;

        // Floods NOOPs and never reads the replies, so the server ends up
        // blocked writing to this session.
        let stalled = TcpStream::connect(server.addr).await.unwrap();
        let (stalled_reader, mut stalled_writer) = stalled.into_split();
        let flood = "NOOP\r\n".repeat(2 * 1024 * 1024 / 6);
        let writer = tokio::spawn(async move {
            let _ = stalled_writer.write_all(flood.as_bytes()).await;
            stalled_writer
        });
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(admin.command("SITE LOADER").await, "200 Exiting to loader.");
        timeout(WAIT, server.handle).await.unwrap().unwrap().unwrap();

        drop(stalled_reader);
        writer.abort();
    }
}
