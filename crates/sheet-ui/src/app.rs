use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Outlet, ParentRoute, Route, Router, Routes},
    ParamSegment, StaticSegment,
};

use crate::components::footer::Footer;
use crate::components::nav::Nav;
use crate::components::toast::ToastProvider;
use crate::i18n::use_locale;
use crate::pages::account::AccountOrdersPage;
use crate::pages::admin::{AdminDashboardPage, AdminOrdersPage, AdminQueuePage};
use crate::pages::checkout::{CheckoutPage, CheckoutSuccessPage};
use crate::pages::contact::ContactPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::materials::MaterialsPage;
use crate::pages::pricing::PricingPage;
use crate::pages::sheets::SheetsPage;
use crate::pages::signup::SignupPage;
use crate::pages::upload::UploadPage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <meta
                    name="description"
                    content="Community laser cutting on industrial buffer sheets. Upload DXF files, get instant pricing."
                />
                <link rel="icon" href="/favicon.svg" type="image/svg+xml" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/sheetmates.css" />
        <Title text="SheetMates" />
        <ToastProvider>
            <Router>
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }.into_any()>
                    <ParentRoute path=ParamSegment("locale") view=LocaleLayout>
                        <Route path=StaticSegment("") view=HomePage />
                        <Route path=StaticSegment("login") view=LoginPage />
                        <Route path=StaticSegment("signup") view=SignupPage />
                        <Route path=StaticSegment("pricing") view=PricingPage />
                        <Route path=StaticSegment("materials") view=MaterialsPage />
                        <Route path=StaticSegment("contact") view=ContactPage />
                        <Route path=StaticSegment("upload") view=UploadPage />
                        <Route path=StaticSegment("sheets") view=SheetsPage />
                        <Route
                            path=(StaticSegment("account"), StaticSegment("orders"))
                            view=AccountOrdersPage
                        />
                        <Route path=StaticSegment("checkout") view=CheckoutPage />
                        <Route
                            path=(StaticSegment("checkout"), StaticSegment("success"))
                            view=CheckoutSuccessPage
                        />
                        <Route path=StaticSegment("admin") view=AdminDashboardPage />
                        <Route
                            path=(StaticSegment("admin"), StaticSegment("orders"))
                            view=AdminOrdersPage
                        />
                        <Route
                            path=(StaticSegment("admin"), StaticSegment("queue"))
                            view=AdminQueuePage
                        />
                    </ParentRoute>
                </Routes>
            </Router>
        </ToastProvider>
    }
}

/// Navbar, page and footer for one locale.
#[component]
fn LocaleLayout() -> impl IntoView {
    let locale = use_locale();

    view! {
        <Html attr:lang=move || locale.get().as_str() />
        <div class="app-layout">
            <Nav />
            <main class="main-content">
                <Outlet />
            </main>
            <Footer />
        </div>
    }
}
