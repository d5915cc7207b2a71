#![allow(dead_code)]

use rss_digest::types::ParsedEntry;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Once;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const GULF_WIRE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
<channel>
  <title>Gulf Wire</title>
  <link>https://gulf.example.com</link>
  <description>Regional news</description>
  <item>
    <title>Dubai opens new metro line</title>
    <link>https://gulf.example.com/metro</link>
    <description>&lt;p&gt;The &lt;b&gt;Dubai&lt;/b&gt; metro &amp;amp; tram network grows.&lt;/p&gt;</description>
    <pubDate>Tue, 14 Oct 2025 08:00:00 GMT</pubDate>
    <media:thumbnail url="https://img.example.com/metro.jpg"/>
  </item>
  <item>
    <title>Abu Dhabi weather update</title>
    <link>https://gulf.example.com/weather</link>
    <description>Sunny skies expected.</description>
    <pubDate>Tue, 14 Oct 2025 09:00:00 GMT</pubDate>
  </item>
  <item>
    <title>Shared story about DUBAI airport</title>
    <link>https://shared.example.com/airport</link>
    <description>Older copy</description>
    <pubDate>Mon, 13 Oct 2025 10:00:00 GMT</pubDate>
  </item>
  <item>
    <title>Expo legacy lives on</title>
    <link>https://gulf.example.com/expo</link>
    <description>Still shaping dubai. &lt;img src="https://img.example.com/expo.png"&gt;</description>
    <pubDate>sometime last week</pubDate>
  </item>
</channel>
</rss>"#;

pub const DESERT_TIMES_ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Desert Times</title>
  <id>urn:desert</id>
  <updated>2025-10-14T12:00:00Z</updated>
  <entry>
    <title>Newer copy: Dubai airport expands</title>
    <link href="https://shared.example.com/airport"/>
    <id>urn:desert:1</id>
    <updated>2025-10-14T12:00:00Z</updated>
    <summary>Terminal news.</summary>
  </entry>
  <entry>
    <title>Dubaization of architecture</title>
    <link href="https://desert.example.com/essay"/>
    <id>urn:desert:2</id>
    <updated>2025-10-14T11:00:00Z</updated>
    <summary>An essay.</summary>
  </entry>
</feed>"#;

/// Serve `routes` (path -> body) over plain HTTP on an ephemeral port.
/// Unknown paths get a 404.
pub async fn spawn_feed_server(routes: HashMap<&'static str, &'static str>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");

                let response = match routes.get(path) {
                    Some(body) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

pub fn entry(url: &str) -> ParsedEntry {
    ParsedEntry {
        title: None,
        url: url.to_string(),
        summary: None,
        content: None,
        published_at: None,
        updated_at: None,
        thumbnails: Vec::new(),
        media: Vec::new(),
        enclosures: Vec::new(),
    }
}
