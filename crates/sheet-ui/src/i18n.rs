//! UI strings for every supported locale.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use sheet_types::Locale;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Msg {
    NavUpload,
    NavSheets,
    NavQueue,
    NavPricing,
    NavMaterials,
    NavContact,
    NavAdmin,
    NavAccount,
    NavLogin,
    NavSignup,
    NavLogout,
    HeroTitle,
    HeroSubtitle,
    HeroCta,
    Email,
    Password,
    DisplayName,
    SignIn,
    CreateAccount,
    NoAccount,
    HaveAccount,
    Material,
    Thickness,
    Quantity,
    PerArea,
    PerCut,
    Subtotal,
    Vat,
    Total,
    UploadTitle,
    UploadHint,
    UploadButton,
    MyParts,
    OrderSelected,
    MyOrders,
    Pay,
    Status,
    OpenSheets,
    CurrentPrice,
    Utilization,
    Reserve,
    ContactTitle,
    Reason,
    Name,
    Message,
    OrderReference,
    Send,
    MessageSent,
    PaymentThanks,
    Loading,
    Nothing,
    FooterTagline,
}

/// The string for `msg` in `locale`.
pub fn t(locale: Locale, msg: Msg) -> &'static str {
    use Locale::*;
    use Msg::*;
    match (msg, locale) {
        (NavUpload, En) => "Upload",
        (NavUpload, Fr) => "Téléverser",
        (NavUpload, Cs) => "Nahrát",
        (NavSheets, En) => "Sheets",
        (NavSheets, Fr) => "Tôles",
        (NavSheets, Cs) => "Plechy",
        (NavQueue, En) => "Queue",
        (NavQueue, Fr) => "File d'attente",
        (NavQueue, Cs) => "Fronta",
        (NavPricing, En) => "Pricing",
        (NavPricing, Fr) => "Tarifs",
        (NavPricing, Cs) => "Ceník",
        (NavMaterials, En) => "Materials",
        (NavMaterials, Fr) => "Matériaux",
        (NavMaterials, Cs) => "Materiály",
        (NavContact, En) => "Contact",
        (NavContact, Fr) => "Contact",
        (NavContact, Cs) => "Kontakt",
        (NavAdmin, En) => "Admin",
        (NavAdmin, Fr) => "Admin",
        (NavAdmin, Cs) => "Správa",
        (NavAccount, En) => "My orders",
        (NavAccount, Fr) => "Mes commandes",
        (NavAccount, Cs) => "Moje objednávky",
        (NavLogin, En) => "Log in",
        (NavLogin, Fr) => "Connexion",
        (NavLogin, Cs) => "Přihlásit",
        (NavSignup, En) => "Sign up",
        (NavSignup, Fr) => "Inscription",
        (NavSignup, Cs) => "Registrace",
        (NavLogout, En) => "Log out",
        (NavLogout, Fr) => "Déconnexion",
        (NavLogout, Cs) => "Odhlásit",
        (HeroTitle, En) => "Laser-cut parts from industrial buffer sheets",
        (HeroTitle, Fr) => "Des pièces découpées au laser dans des tôles tampons industrielles",
        (HeroTitle, Cs) => "Laserem řezané díly z průmyslových zbytkových plechů",
        (HeroSubtitle, En) => "Upload a DXF, get an instant price, share a sheet with other makers.",
        (HeroSubtitle, Fr) => "Téléversez un DXF, obtenez un prix immédiat, partagez une tôle avec d'autres makers.",
        (HeroSubtitle, Cs) => "Nahrajte DXF, získejte okamžitou cenu a sdílejte plech s dalšími tvůrci.",
        (HeroCta, En) => "Upload a drawing",
        (HeroCta, Fr) => "Téléverser un dessin",
        (HeroCta, Cs) => "Nahrát výkres",
        (Email, En) => "Email",
        (Email, Fr) => "E-mail",
        (Email, Cs) => "E-mail",
        (Password, En) => "Password",
        (Password, Fr) => "Mot de passe",
        (Password, Cs) => "Heslo",
        (DisplayName, En) => "Display name",
        (DisplayName, Fr) => "Nom affiché",
        (DisplayName, Cs) => "Zobrazované jméno",
        (SignIn, En) => "Sign in",
        (SignIn, Fr) => "Se connecter",
        (SignIn, Cs) => "Přihlásit se",
        (CreateAccount, En) => "Create account",
        (CreateAccount, Fr) => "Créer un compte",
        (CreateAccount, Cs) => "Vytvořit účet",
        (NoAccount, En) => "No account yet?",
        (NoAccount, Fr) => "Pas encore de compte ?",
        (NoAccount, Cs) => "Ještě nemáte účet?",
        (HaveAccount, En) => "Already registered?",
        (HaveAccount, Fr) => "Déjà inscrit ?",
        (HaveAccount, Cs) => "Už máte účet?",
        (Material, En) => "Material",
        (Material, Fr) => "Matériau",
        (Material, Cs) => "Materiál",
        (Thickness, En) => "Thickness (mm)",
        (Thickness, Fr) => "Épaisseur (mm)",
        (Thickness, Cs) => "Tloušťka (mm)",
        (Quantity, En) => "Quantity",
        (Quantity, Fr) => "Quantité",
        (Quantity, Cs) => "Množství",
        (PerArea, En) => "Area",
        (PerArea, Fr) => "Surface",
        (PerArea, Cs) => "Plocha",
        (PerCut, En) => "Cutting",
        (PerCut, Fr) => "Découpe",
        (PerCut, Cs) => "Řezání",
        (Subtotal, En) => "Subtotal",
        (Subtotal, Fr) => "Sous-total",
        (Subtotal, Cs) => "Mezisoučet",
        (Vat, En) => "VAT",
        (Vat, Fr) => "TVA",
        (Vat, Cs) => "DPH",
        (Total, En) => "Total",
        (Total, Fr) => "Total",
        (Total, Cs) => "Celkem",
        (UploadTitle, En) => "Upload a DXF drawing",
        (UploadTitle, Fr) => "Téléverser un dessin DXF",
        (UploadTitle, Cs) => "Nahrát výkres DXF",
        (UploadHint, En) => "ASCII DXF, millimetres. We check it for manufacturability right away.",
        (UploadHint, Fr) => "DXF ASCII, en millimètres. Nous vérifions sa fabricabilité immédiatement.",
        (UploadHint, Cs) => "ASCII DXF v milimetrech. Vyrobitelnost zkontrolujeme hned.",
        (UploadButton, En) => "Upload",
        (UploadButton, Fr) => "Téléverser",
        (UploadButton, Cs) => "Nahrát",
        (MyParts, En) => "My parts",
        (MyParts, Fr) => "Mes pièces",
        (MyParts, Cs) => "Moje díly",
        (OrderSelected, En) => "Order selected parts",
        (OrderSelected, Fr) => "Commander la sélection",
        (OrderSelected, Cs) => "Objednat vybrané díly",
        (MyOrders, En) => "My orders",
        (MyOrders, Fr) => "Mes commandes",
        (MyOrders, Cs) => "Moje objednávky",
        (Pay, En) => "Pay",
        (Pay, Fr) => "Payer",
        (Pay, Cs) => "Zaplatit",
        (Status, En) => "Status",
        (Status, Fr) => "Statut",
        (Status, Cs) => "Stav",
        (OpenSheets, En) => "Open sheets",
        (OpenSheets, Fr) => "Tôles disponibles",
        (OpenSheets, Cs) => "Dostupné plechy",
        (CurrentPrice, En) => "Current price",
        (CurrentPrice, Fr) => "Prix actuel",
        (CurrentPrice, Cs) => "Aktuální cena",
        (Utilization, En) => "Utilization",
        (Utilization, Fr) => "Occupation",
        (Utilization, Cs) => "Využití",
        (Reserve, En) => "Reserve",
        (Reserve, Fr) => "Réserver",
        (Reserve, Cs) => "Rezervovat",
        (ContactTitle, En) => "Contact us",
        (ContactTitle, Fr) => "Nous contacter",
        (ContactTitle, Cs) => "Kontaktujte nás",
        (Reason, En) => "Reason",
        (Reason, Fr) => "Motif",
        (Reason, Cs) => "Důvod",
        (Name, En) => "Name",
        (Name, Fr) => "Nom",
        (Name, Cs) => "Jméno",
        (Message, En) => "Message",
        (Message, Fr) => "Message",
        (Message, Cs) => "Zpráva",
        (OrderReference, En) => "Order reference (optional)",
        (OrderReference, Fr) => "Référence de commande (facultatif)",
        (OrderReference, Cs) => "Číslo objednávky (nepovinné)",
        (Send, En) => "Send",
        (Send, Fr) => "Envoyer",
        (Send, Cs) => "Odeslat",
        (MessageSent, En) => "Thanks, we will get back to you soon.",
        (MessageSent, Fr) => "Merci, nous vous répondrons rapidement.",
        (MessageSent, Cs) => "Děkujeme, brzy se vám ozveme.",
        (PaymentThanks, En) => "Payment received. Your parts are on their way to the cutter.",
        (PaymentThanks, Fr) => "Paiement reçu. Vos pièces partent vers la découpe.",
        (PaymentThanks, Cs) => "Platba přijata. Vaše díly míří k řezání.",
        (Loading, En) => "Loading...",
        (Loading, Fr) => "Chargement...",
        (Loading, Cs) => "Načítání...",
        (Nothing, En) => "Nothing here yet.",
        (Nothing, Fr) => "Rien pour l'instant.",
        (Nothing, Cs) => "Zatím tu nic není.",
        (FooterTagline, En) => "Community laser cutting on industrial buffer sheets.",
        (FooterTagline, Fr) => "Découpe laser communautaire sur tôles tampons industrielles.",
        (FooterTagline, Cs) => "Komunitní řezání laserem na průmyslových zbytkových plechech.",
    }
}

/// Locale from the `:locale` route segment; unknown values fall back to English.
pub fn use_locale() -> Memo<Locale> {
    let params = use_params_map();
    Memo::new(move |_| {
        params
            .read()
            .get("locale")
            .and_then(|l| Locale::from_segment(&l))
            .unwrap_or_default()
    })
}

/// Reactive translation helper for views.
pub fn use_t() -> impl Fn(Msg) -> &'static str + Copy + 'static {
    let locale = use_locale();
    move |msg| t(locale.get(), msg)
}
