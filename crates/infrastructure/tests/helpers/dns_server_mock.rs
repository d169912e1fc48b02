#![allow(dead_code)]
use dnscache_infrastructure::dns::forwarding::MessageBuilder;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::Record;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// What the mock server does with one question.
pub enum MockReply {
    /// NOERROR with these answer records
    Records(Vec<Record>),
    /// Empty response with this rcode
    Rcode(ResponseCode),
    /// NXDOMAIN with this SOA in the authority section
    NxDomain(Record),
    /// Never answer
    Silent,
}

/// Local UDP DNS server answering through a handler closure.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(handler: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&Query) -> MockReply + Send + Sync + 'static,
    {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        let Ok(request) = Message::from_vec(&buf[..len]) else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);

                        if let Some(response) = Self::respond(&request, &handler) {
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    fn respond<F>(request: &Message, handler: &F) -> Option<Vec<u8>>
    where
        F: Fn(&Query) -> MockReply,
    {
        let question = request.queries().first()?.clone();
        let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
        response.add_query(question.clone());

        match handler(&question) {
            MockReply::Records(records) => {
                for record in records {
                    response.add_answer(record);
                }
            }
            MockReply::Rcode(rcode) => {
                response.set_response_code(rcode);
            }
            MockReply::NxDomain(soa) => {
                response.set_response_code(ResponseCode::NXDomain);
                response.add_name_server(soa);
            }
            MockReply::Silent => return None,
        }

        MessageBuilder::serialize_message(&response).ok()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Questions received so far
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
