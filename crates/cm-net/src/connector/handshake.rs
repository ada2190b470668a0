use super::{
    envelope,
    message::{Message, MessageKind, Operation},
    responder::validate_answer,
    session::Session,
    stream::{Role, Stream},
};
use crate::{enigma::run_blocking, NetError, Status};
use cm_vault::SessionKeys;
use tracing::{debug, error, info};
use zeroize::Zeroizing;

/// Handshake messages in wire order
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum HandshakeStep {
    /// Dialer names itself, the acceptor and the PIN
    Login,
    /// Acceptor confirms the login
    Acceptance,
    /// Acceptor hands out the session keys
    Keys,
    /// Acceptor asks for the client identity block, showing its own
    ServerIdentity,
    /// Dialer answers with its identity block
    ClientIdentity,
}

/// The two connections of a session, named by the port the dialer uses
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Link {
    /// Base port: acceptor inbound, dialer outbound
    Base,
    /// Base port + 1: acceptor outbound, dialer inbound
    Next,
}

pub(crate) const HANDSHAKE: [HandshakeStep; 5] = [
    HandshakeStep::Login,
    HandshakeStep::Acceptance,
    HandshakeStep::Keys,
    HandshakeStep::ServerIdentity,
    HandshakeStep::ClientIdentity,
];

impl HandshakeStep {
    /// The role that writes this step, the other one reads it
    pub(crate) fn sender(self) -> Role {
        match self {
            HandshakeStep::Login | HandshakeStep::ClientIdentity => Role::Initiator,
            HandshakeStep::Acceptance | HandshakeStep::Keys | HandshakeStep::ServerIdentity => {
                Role::Acceptor
            }
        }
    }

    pub(crate) fn link(self) -> Link {
        match self {
            HandshakeStep::Login | HandshakeStep::Acceptance => Link::Base,
            _ => Link::Next,
        }
    }
}

/// Messages a later step answers or matches against
#[derive(Default)]
struct Progress {
    login: Option<Message>,
    identity_request: Option<Message>,
}

impl Progress {
    fn login(&self) -> Result<&Message, NetError> {
        self.login
            .as_ref()
            .ok_or(NetError::InvalidMessage("login not exchanged"))
    }

    fn identity_request(&self) -> Result<&Message, NetError> {
        self.identity_request
            .as_ref()
            .ok_or(NetError::InvalidMessage("identity request not exchanged"))
    }
}

fn breach(reason: &'static str) -> NetError {
    error!(reason, "security breach during handshake");
    NetError::SecurityBreach(reason)
}

/// Maps a failed check to a breach. A failed crypto worker stays an
/// ordinary error.
fn or_breach(reason: &'static str) -> impl FnOnce(NetError) -> NetError {
    move |e| match e {
        NetError::Worker(_) => e,
        _ => breach(reason),
    }
}

impl Session {
    pub(super) async fn run_handshake(&mut self) -> Result<(), NetError> {
        let mut progress = Progress::default();
        for step in HANDSHAKE {
            let writing = step.sender() == self.role;
            debug!(?step, role = ?self.role, writing, "handshake step");
            match writing {
                true => self.write_step(step, &mut progress).await?,
                false => self.read_step(step, &mut progress).await?,
            }
        }
        Ok(())
    }

    fn link(&self, link: Link) -> &Stream {
        match (self.role, link) {
            (Role::Acceptor, Link::Base) | (Role::Initiator, Link::Next) => &self.inbound,
            _ => &self.outbound,
        }
    }

    fn link_mut(&mut self, link: Link) -> &mut Stream {
        match (self.role, link) {
            (Role::Acceptor, Link::Base) | (Role::Initiator, Link::Next) => &mut self.inbound,
            _ => &mut self.outbound,
        }
    }

    async fn write_step(
        &mut self,
        step: HandshakeStep,
        progress: &mut Progress,
    ) -> Result<(), NetError> {
        let link = step.link();
        match step {
            HandshakeStep::Login => {
                let buddy = self.buddy.clone().ok_or(NetError::BuddyKeyMissing)?;
                let names = format!("{}|{}", self.local_user, buddy);
                let pin = self.pin.clone();
                let login = self.link_mut(link).requester_mut()?.prepare(
                    Operation::Login.id(),
                    names.as_bytes(),
                    pin.as_bytes(),
                );
                let packed = Zeroizing::new(login.to_packed()?);
                let sealed = run_blocking(&self.enigma, move |e| e.encrypt_rsa(&packed)).await?;
                self.link(link).requester()?.send_raw(&sealed).await?;
                progress.login = Some(login);
            }
            HandshakeStep::Acceptance => {
                let answer = Message::answer(progress.login()?, Status::Ok, b"", b"");
                let packed = answer.to_packed()?;
                let sealed = run_blocking(&self.enigma, move |e| e.encrypt_rsa(&packed)).await?;
                self.link(link).requester()?.send_raw(&sealed).await?;
            }
            HandshakeStep::Keys => {
                let _clear = scopeguard::guard(self.enigma.clone(), |enigma| enigma.clear_keys());
                let sealed =
                    run_blocking(&self.enigma, |e| e.encrypt_rsa(&e.export_keys()?)).await?;
                self.link(link).requester()?.send_raw(&sealed).await?;
            }
            HandshakeStep::ServerIdentity => {
                let sealed =
                    run_blocking(&self.enigma, |e| e.encrypt_rsa(e.identity().server_id()))
                        .await?;
                let request = self
                    .link_mut(link)
                    .requester_mut()?
                    .send(Operation::GetBlockId.id(), &sealed, b"")
                    .await?;
                progress.identity_request = Some(request);
            }
            HandshakeStep::ClientIdentity => {
                let sealed =
                    run_blocking(&self.enigma, |e| e.encrypt_rsa(e.identity().client_id()))
                        .await?;
                let request = progress.identity_request()?;
                self.link(link)
                    .responder()?
                    .send(Status::Ok, request, &sealed, b"")
                    .await?;
            }
        }
        Ok(())
    }

    async fn read_step(
        &mut self,
        step: HandshakeStep,
        progress: &mut Progress,
    ) -> Result<(), NetError> {
        let link = step.link();
        match step {
            HandshakeStep::Login => {
                let sealed = self.link(link).requester()?.read_raw().await?;
                let packed = run_blocking(&self.enigma, move |e| e.decrypt_rsa(&sealed))
                    .await
                    .map_err(or_breach("login does not decrypt"))?;
                let login = self.accept_login(&packed)?;
                progress.login = Some(login);
            }
            HandshakeStep::Acceptance => {
                let sealed = self.link(link).requester()?.read_raw().await?;
                let packed = run_blocking(&self.enigma, move |e| e.decrypt_rsa(&sealed))
                    .await
                    .map_err(or_breach("acceptance does not decrypt"))?;
                let answer =
                    Message::from_packed(&packed).map_err(|_| breach("acceptance does not decode"))?;
                validate_answer(progress.login()?, &answer)
                    .map_err(|_| breach("acceptance does not match the login"))?;
                envelope::check_freshness(&answer, cm_crypto::now())
                    .map_err(|_| breach("stale acceptance"))?;
                if answer.status != Some(Status::Ok) {
                    return Err(breach("login refused"));
                }
                info!(buddy = ?self.buddy, "login accepted by the peer");
            }
            HandshakeStep::Keys => {
                let sealed = self.link(link).requester()?.read_raw().await?;
                let _clear = scopeguard::guard(self.enigma.clone(), |enigma| enigma.clear_keys());
                run_blocking(&self.enigma, move |e| {
                    let bundle = e.decrypt_rsa(&sealed)?;
                    e.install_keys(SessionKeys::from_bytes(&bundle)?)
                })
                .await?;
                debug!("session keys installed");
            }
            HandshakeStep::ServerIdentity => {
                let request = self.link(link).requester()?.read().await?;
                if request.operation() != Some(Operation::GetBlockId) {
                    return Err(breach("expected an identity request"));
                }
                let sealed = request.data.clone();
                let id = run_blocking(&self.enigma, move |e| e.decrypt_rsa(&sealed))
                    .await
                    .map_err(or_breach("server identity does not decrypt"))?;
                if !cm_crypto::are_equal(&id, self.enigma.identity().server_id()) {
                    return Err(breach("server identity mismatch"));
                }
                progress.identity_request = Some(request);
            }
            HandshakeStep::ClientIdentity => {
                let answer = self
                    .link(link)
                    .responder()?
                    .read(progress.identity_request()?)
                    .await?;
                let id = run_blocking(&self.enigma, move |e| e.decrypt_rsa(&answer.data))
                    .await
                    .map_err(or_breach("client identity does not decrypt"))?;
                if !cm_crypto::are_equal(&id, self.enigma.identity().client_id()) {
                    return Err(breach("client identity mismatch"));
                }
            }
        }
        Ok(())
    }

    /// Checks the decrypted login and adopts the dialer's public key as the
    /// buddy key
    fn accept_login(&mut self, packed: &[u8]) -> Result<Message, NetError> {
        let login = Message::from_packed(packed).map_err(|_| breach("login does not decode"))?;
        if login.kind != MessageKind::Request || login.operation() != Some(Operation::Login) {
            return Err(breach("not a login request"));
        }
        envelope::check_freshness(&login, cm_crypto::now()).map_err(|_| breach("stale login"))?;

        let names = std::str::from_utf8(&login.data).map_err(|_| breach("malformed login"))?;
        let (dialer, acceptor) = names
            .split_once('|')
            .ok_or_else(|| breach("malformed login"))?;
        if acceptor != self.local_user {
            return Err(breach("login for another user"));
        }
        if !cm_crypto::are_equal(&login.extra, self.pin.as_bytes()) {
            return Err(breach("wrong pin"));
        }
        let key = self
            .keystore
            .public_key(dialer)
            .ok_or_else(|| breach("unknown dialer"))?;
        self.enigma.set_buddy_public_key(key);
        self.buddy = Some(dialer.to_string());
        info!(buddy = dialer, "login from the peer accepted");
        Ok(login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_alternate_between_the_links() {
        let senders: Vec<Role> = HANDSHAKE.iter().map(|step| step.sender()).collect();
        assert_eq!(
            senders,
            [
                Role::Initiator,
                Role::Acceptor,
                Role::Acceptor,
                Role::Acceptor,
                Role::Initiator
            ]
        );
        assert_eq!(HandshakeStep::Login.link(), Link::Base);
        assert_eq!(HandshakeStep::Acceptance.link(), Link::Base);
        assert_eq!(HandshakeStep::Keys.link(), Link::Next);
        assert_eq!(HandshakeStep::ClientIdentity.link(), Link::Next);
    }

    #[test]
    fn keys_travel_before_the_enveloped_steps() {
        let position = |step| HANDSHAKE.iter().position(|s| *s == step).unwrap();
        assert!(position(HandshakeStep::Login) < position(HandshakeStep::Keys));
        assert!(position(HandshakeStep::Keys) < position(HandshakeStep::ServerIdentity));
        assert!(position(HandshakeStep::ServerIdentity) < position(HandshakeStep::ClientIdentity));
    }
}
