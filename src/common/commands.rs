/// Lệnh UI gửi xuống controller.
#[derive(Debug, Clone)]
pub enum ShareCommand {
    /// Open a share intent for one platform.
    /// - target: platform name as shown on the button (whatsapp, twitter, ...)
    /// - message: user-edited template; the referral link is appended
    Share { target: String, message: String },
    /// Send one direct message per line of `recipients`, staggered.
    SendBulk { recipients: String, message: String },
    /// Open a QR code image for the referral link.
    ShowQrCode,
}
