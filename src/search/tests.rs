#[cfg(test)]
mod tests {
    use crate::search::{DuckDuckGoSearch, WebSearch, parse_results};
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const RESULTS_PAGE: &str = r##"<!DOCTYPE html>
<html><body>
<div class="results">
  <div class="result results_links result--ad">
    <h2 class="result__title"><a class="result__a" href="https://ads.example.com">Sponsored</a></h2>
    <a class="result__snippet">Buy now</a>
  </div>
  <div class="result results_links">
    <h2 class="result__title">
      <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FQuantum_computing&amp;rut=1">Quantum computing -
      Wikipedia</a>
    </h2>
    <a class="result__snippet" href="#">A quantum computer exploits <b>superposition</b>.</a>
  </div>
  <div class="result results_links">
    <h2 class="result__title"><a class="result__a" href="https://www.ibm.com/topics/quantum-computing">What is Quantum Computing? | IBM</a></h2>
    <a class="result__snippet">Quantum computing uses qubits.</a>
  </div>
  <div class="result results_links">
    <h2 class="result__title"><a class="result__a" href="https://www.ibm.com/topics/quantum-computing">Duplicate</a></h2>
  </div>
  <div class="result results_links">
    <h2 class="result__title"><a class="result__a" href="https://example.org/no-snippet">No snippet here</a></h2>
  </div>
</div>
</body></html>"##;

    #[test]
    fn test_parse_results_in_page_order() {
        let results = parse_results(RESULTS_PAGE, 10).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Quantum computing - Wikipedia");
        assert_eq!(
            results[0].url,
            "https://en.wikipedia.org/wiki/Quantum_computing"
        );
        assert_eq!(
            results[0].snippet,
            "A quantum computer exploits superposition."
        );
        assert_eq!(results[1].title, "What is Quantum Computing? | IBM");
        assert_eq!(results[2].url, "https://example.org/no-snippet");
        assert!(results[2].snippet.is_empty());
    }

    #[test]
    fn test_parse_results_respects_max() {
        let results = parse_results(RESULTS_PAGE, 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].title, "What is Quantum Computing? | IBM");
    }

    #[test]
    fn test_parse_results_empty_page() {
        let results = parse_results("<html><body>No results.</body></html>", 5).unwrap();
        assert!(results.is_empty());
    }

    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/html/", addr)
    }

    #[tokio::test]
    async fn test_search_against_local_endpoint() {
        let body_len = RESULTS_PAGE.len();
        let response: &'static str = Box::leak(
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body_len, RESULTS_PAGE
            )
            .into_boxed_str(),
        );
        let endpoint = serve_once(response).await;
        let search = DuckDuckGoSearch::with_endpoint(endpoint, Duration::from_secs(5));

        let results = search.search("quantum computing", 5).await;
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_error_status_returns_empty() {
        let endpoint = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let search = DuckDuckGoSearch::with_endpoint(endpoint, Duration::from_secs(5));

        assert!(search.search("anything", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_search_timeout_returns_empty() {
        // 接受连接但从不响应
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let search = DuckDuckGoSearch::with_endpoint(
            format!("http://{}/html/", addr),
            Duration::from_millis(200),
        );

        let started = Instant::now();
        let results = search.search("slow query", 5).await;
        assert!(results.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_search_unreachable_returns_empty() {
        let search =
            DuckDuckGoSearch::with_endpoint("http://127.0.0.1:1/html/", Duration::from_secs(2));
        assert!(search.search("anything", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_max_results_skips_request() {
        let search =
            DuckDuckGoSearch::with_endpoint("http://127.0.0.1:1/html/", Duration::from_secs(2));
        assert!(search.search("anything", 0).await.is_empty());
        assert_eq!(search.name(), "DuckDuckGo");
    }
}
