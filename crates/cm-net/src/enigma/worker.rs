use super::Enigma;
use crate::NetError;
use std::sync::Arc;

/// Runs `work` against `enigma` on the blocking thread pool.
///
/// RSA private key operations take milliseconds, long enough to stall
/// every other session scheduled on the same runtime thread.
pub(crate) async fn run_blocking<T, F>(enigma: &Arc<Enigma>, work: F) -> Result<T, NetError>
where
    T: Send + 'static,
    F: FnOnce(&Enigma) -> Result<T, NetError> + Send + 'static,
{
    let enigma = enigma.clone();
    tokio::task::spawn_blocking(move || work(&enigma)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn work_runs_off_the_runtime_threads() {
        let (server, client) = fixtures::enigma_pair();
        let runtime_thread = std::thread::current().id();
        let (cipher, thread) = run_blocking(&server, |enigma| {
            Ok((enigma.encrypt_rsa(b"keys")?, std::thread::current().id()))
        })
        .await
        .unwrap();
        assert_ne!(thread, runtime_thread);

        let plain = run_blocking(&client, move |enigma| enigma.decrypt_rsa(&cipher))
            .await
            .unwrap();
        assert_eq!(plain.as_slice(), b"keys");
    }

    #[tokio::test]
    async fn errors_and_panics_come_back_as_errors() {
        let enigma = Arc::new(Enigma::new(fixtures::alice()));
        assert_eq!(
            run_blocking(&enigma, |enigma| enigma.encrypt(b"x")).await,
            Err(NetError::CipherNotReady)
        );

        let panicked = run_blocking(&enigma, |_| -> Result<(), NetError> { panic!("worker died") });
        assert!(matches!(panicked.await, Err(NetError::Worker(_))));
    }
}
