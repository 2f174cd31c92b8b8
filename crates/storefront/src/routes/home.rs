//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use dev_books_core::Book;

use crate::filters;
use crate::state::AppState;

// =============================================================================
// Static Content
// =============================================================================

/// A reader testimonial.
#[derive(Clone)]
pub struct TestimonialView {
    pub name: String,
    pub role: String,
    pub quote: String,
}

/// An author profile.
#[derive(Clone)]
pub struct AuthorView {
    pub name: String,
    pub role: String,
    pub bio: String,
}

/// A frequently asked question.
#[derive(Clone)]
pub struct FaqView {
    pub question: String,
    pub answer: String,
}

fn testimonial(name: &str, role: &str, quote: &str) -> TestimonialView {
    TestimonialView {
        name: name.to_string(),
        role: role.to_string(),
        quote: quote.to_string(),
    }
}

/// Static testimonials for the homepage.
fn get_testimonials() -> Vec<TestimonialView> {
    vec![
        testimonial(
            "Alex Johnson",
            "Frontend Developer",
            "This book transformed how I approach programming problems. Highly recommended!",
        ),
        testimonial(
            "Sarah Williams",
            "Software Engineer",
            "Clear explanations and practical examples make this an essential resource for any developer.",
        ),
        testimonial(
            "Michael Chen",
            "CS Student",
            "As a student, this book helped me understand complex concepts that my classes couldn't explain well.",
        ),
    ]
}

/// Static author profiles for the homepage.
fn get_authors() -> Vec<AuthorView> {
    vec![
        AuthorView {
            name: "Jane Developer".to_string(),
            role: "Senior Software Architect".to_string(),
            bio: "With 15+ years of experience in enterprise software development, Jane specializes in scalable architecture and best practices.".to_string(),
        },
        AuthorView {
            name: "John Algorithm".to_string(),
            role: "Computer Science Professor".to_string(),
            bio: "Dr. Algorithm has taught data structures at leading universities for over a decade and contributes to open source projects.".to_string(),
        },
        AuthorView {
            name: "Sarah Frontend".to_string(),
            role: "Web Development Expert".to_string(),
            bio: "Sarah has worked with Fortune 500 companies to build responsive, accessible websites and is passionate about teaching modern web development techniques.".to_string(),
        },
    ]
}

/// Static FAQ entries for the homepage.
fn get_faqs() -> Vec<FaqView> {
    [
        (
            "Do you offer digital and physical copies?",
            "Yes, all our books are available in both PDF and print formats. Digital copies include lifetime updates.",
        ),
        (
            "How long do I have access to digital content?",
            "You get lifetime access to all digital content, including any future updates to the book.",
        ),
        (
            "Do you offer refunds if I'm not satisfied?",
            "Absolutely! We offer a 30-day money-back guarantee if you're not completely satisfied with your purchase.",
        ),
        (
            "Are the code examples available for download?",
            "Yes, all code examples are available in a GitHub repository that you'll get access to with your purchase.",
        ),
    ]
    .into_iter()
    .map(|(question, answer)| FaqView {
        question: question.to_string(),
        answer: answer.to_string(),
    })
    .collect()
}

// =============================================================================
// Book Views
// =============================================================================

/// Book display data for templates.
#[derive(Clone)]
pub struct BookView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub cover_image: String,
    pub description: String,
    pub checkout_url: String,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price.display(),
            cover_image: book.cover_image.clone(),
            description: book.description.clone(),
            checkout_url: book.checkout_path(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// The single highlighted book.
    pub featured: BookView,
    /// Every book, in catalog order.
    pub books: Vec<BookView>,
    pub testimonials: Vec<TestimonialView>,
    pub authors: Vec<AuthorView>,
    pub faqs: Vec<FaqView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog();

    HomeTemplate {
        featured: BookView::from(catalog.featured()),
        books: catalog.list_all().iter().map(BookView::from).collect(),
        testimonials: get_testimonials(),
        authors: get_authors(),
        faqs: get_faqs(),
    }
}

#[cfg(test)]
mod tests {
    use dev_books_core::{BookId, Price};

    use super::*;

    #[test]
    fn test_book_view_formats_price_and_link() {
        let book = Book {
            id: BookId::new("3"),
            title: "Web Development Mastery".to_string(),
            author: "Sarah Frontend".to_string(),
            price: Price::usd(3499),
            cover_image: "/static/images/web-development.svg".to_string(),
            description: String::new(),
            featured: false,
        };

        let view = BookView::from(&book);

        assert_eq!(view.price, "$34.99");
        assert_eq!(view.checkout_url, "/checkout?bookId=3");
    }

    #[test]
    fn test_static_sections_are_populated() {
        assert_eq!(get_testimonials().len(), 3);
        assert_eq!(get_authors().len(), 3);
        assert_eq!(get_faqs().len(), 4);
    }
}
