use sluice_dns_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, write_with_length_prefix,
};
use sluice_dns_infrastructure::dns::DnsRequestHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tracing::{debug, info, warn};

const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);
const UDP_RECV_BUFFER: usize = 4096;

pub async fn start_dns_server(
    bind_addr: String,
    handler: DnsRequestHandler,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
    let tcp_listener = create_tcp_listener(domain, socket_addr)?;

    info!(bind_address = %socket_addr, "DNS server ready (UDP + TCP)");

    let udp = tokio::spawn(run_udp_loop(udp_socket, handler.clone()));
    let tcp = tokio::spawn(run_tcp_loop(tcp_listener, handler));

    tokio::select! {
        result = udp => result?,
        result = tcp => result?,
    }
    Ok(())
}

async fn run_udp_loop(socket: Arc<UdpSocket>, handler: DnsRequestHandler) {
    let mut recv_buf = [0u8; UDP_RECV_BUFFER];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                // ICMP port unreachable from a previous reply shows up here on some platforms
                debug!(error = %e, "UDP recv error");
                continue;
            }
        };

        let request: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let socket = socket.clone();
        let handler = handler.clone();
        tokio::spawn(async move {
            if let Some(response) = handler.handle_udp(&request).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "UDP send failed");
                }
            }
        });
    }
}

async fn run_tcp_loop(listener: TcpListener, handler: DnsRequestHandler) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let handler = handler.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve_tcp_connection(stream, &handler).await {
                        debug!(client = %peer, error = %e, "TCP connection closed with error");
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "TCP accept failed");
            }
        }
    }
}

/// Serve length-prefixed requests on one connection until the client
/// closes it or stays idle past the timeout.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    handler: &DnsRequestHandler,
) -> io::Result<()> {
    loop {
        let request =
            match tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream)).await
            {
                Ok(Ok(request)) => request,
                Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Ok(Err(e)) => return Err(e),
                Err(_) => return Ok(()),
            };

        match handler.handle_tcp(&request).await {
            Some(response) => write_with_length_prefix(&mut stream, &response).await?,
            None => return Ok(()),
        }
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    if let Err(e) = socket.set_recv_buffer_size(512 * 1024) {
        warn!(error = %e, "Could not enlarge UDP receive buffer");
    }
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
