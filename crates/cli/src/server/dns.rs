use anyhow::Context;
use burrow_dns_application::use_cases::ForwardQueryUseCase;
use burrow_dns_domain::Config;
use burrow_dns_infrastructure::dns::{Router, UdpUpstreamClient, WireCodec};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Bind the listener, run the router until an interrupt, drain, release.
///
/// Lifecycle: starting (bind, fatal on failure) -> listening -> draining
/// (on ctrl-c, bounded by the configured grace) -> stopped.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = config
        .listen_addr()
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr()))?;

    let upstream_addr = config
        .upstream_addr()
        .with_context(|| format!("Invalid upstream address '{}'", config.forward.upstream))?;

    let socket = bind_udp_socket(socket_addr)
        .with_context(|| format!("Failed to bind listen socket on {}", socket_addr))?;
    let socket = Arc::new(socket);
    let local_addr = socket.local_addr()?;

    info!(
        bind_address = %local_addr,
        upstream = %upstream_addr,
        max_in_flight = config.forward.max_in_flight,
        "DNS forwarder listening"
    );

    let codec = Arc::new(WireCodec::new());
    let upstream = Arc::new(UdpUpstreamClient::new(
        upstream_addr,
        config.forward.query_timeout(),
    ));
    let use_case = Arc::new(ForwardQueryUseCase::new(
        upstream,
        codec.clone(),
        config.forward.query_timeout(),
    ));

    let shutdown = CancellationToken::new();
    let router = Router::new(
        socket,
        use_case,
        codec,
        config.forward.max_in_flight,
        shutdown.clone(),
        config.forward.shutdown_grace(),
    );

    let router_task = tokio::spawn(router.run());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Interrupt received, draining in-flight queries");
    shutdown.cancel();

    if let Err(e) = router_task.await {
        error!(error = %e, "Router task ended abnormally");
    }

    Ok(())
}

fn bind_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
