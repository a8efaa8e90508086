use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>PetPost - Find your new best friend</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem auto; max-width: 960px; color: #1d1d1f; }
    h1 { margin-bottom: 0.25rem; }
    .tabs button { margin-right: 0.5rem; padding: 0.5rem 1rem; }
    .tabs button.active { font-weight: 700; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
    .pet img { width: 100%; height: 200px; object-fit: cover; border-radius: 6px; background: #f2f2f2; }
    .muted { color: #6e6e73; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    textarea { min-height: 100px; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    #preview { display: none; width: 100%; max-height: 260px; object-fit: cover; margin-top: 0.5rem; }
    #toast { position: fixed; right: 1rem; bottom: 1rem; padding: 0.75rem 1rem; border-radius: 6px; color: #fff; display: none; }
    #toast.ok { background: #1e8e3e; }
    #toast.err { background: #c5221f; }
  </style>
</head>
<body>
  <h1>PetPost</h1>
  <p class="muted">Browse pets looking for a home, or list one for adoption.</p>

  <div class="tabs">
    <button id="browseTab" class="active">Browse pets</button>
    <button id="addTab">Add a pet</button>
  </div>

  <section id="browse">
    <div id="listing"><p class="muted">Loading pets...</p></div>
  </section>

  <section id="add" style="display:none">
    <form id="petForm" class="card">
      <label for="name">Pet Name *</label>
      <input id="name" name="name" placeholder="e.g., Buddy" required />

      <label for="age">Age (years) *</label>
      <input id="age" name="age" type="number" min="0" placeholder="e.g., 3" required />

      <label for="breed">Breed *</label>
      <input id="breed" name="breed" placeholder="e.g., Golden Retriever" required />

      <label for="description">Description</label>
      <textarea id="description" name="description" placeholder="Tell us about this pet's personality..."></textarea>

      <label for="petImage">Pet Photo *</label>
      <input id="petImage" type="file" accept="image/*" />
      <img id="preview" alt="Pet preview" />

      <button id="submitBtn" type="submit">Add Pet</button>
    </form>
  </section>

  <div id="toast"></div>

  <script>
    const browse = document.getElementById('browse');
    const add = document.getElementById('add');
    const browseTab = document.getElementById('browseTab');
    const addTab = document.getElementById('addTab');
    const form = document.getElementById('petForm');
    const fileInput = document.getElementById('petImage');
    const preview = document.getElementById('preview');
    const submitBtn = document.getElementById('submitBtn');
    const toastEl = document.getElementById('toast');

    function showTab(which) {
      browse.style.display = which === 'browse' ? '' : 'none';
      add.style.display = which === 'add' ? '' : 'none';
      browseTab.classList.toggle('active', which === 'browse');
      addTab.classList.toggle('active', which === 'add');
    }
    browseTab.addEventListener('click', () => showTab('browse'));
    addTab.addEventListener('click', () => showTab('add'));

    function toast(message, ok) {
      toastEl.textContent = message;
      toastEl.className = ok ? 'ok' : 'err';
      toastEl.style.display = 'block';
      setTimeout(() => { toastEl.style.display = 'none'; }, 4000);
    }

    function el(tag, className, text) {
      const node = document.createElement(tag);
      if (className) node.className = className;
      if (text !== undefined) node.textContent = text;
      return node;
    }

    function renderPets(pets) {
      const listing = document.getElementById('listing');
      listing.replaceChildren();
      if (!pets.length) {
        listing.appendChild(el('p', 'muted', 'No pets listed yet. Be the first to add one!'));
        return;
      }
      const grid = el('div', 'grid');
      for (const pet of pets) {
        const card = el('div', 'card pet');
        const img = el('img');
        img.src = pet.imageUrl;
        img.alt = pet.name;
        card.appendChild(img);
        card.appendChild(el('h3', '', pet.name));
        card.appendChild(el('p', 'muted', `${pet.age} ${pet.age === 1 ? 'year' : 'years'} old`));
        card.appendChild(el('p', '', pet.breed));
        if (pet.description) card.appendChild(el('p', 'muted', pet.description));
        grid.appendChild(card);
      }
      listing.appendChild(grid);
    }

    async function loadPets() {
      try {
        const res = await fetch('/api/pets');
        if (!res.ok) throw new Error('fetch failed');
        const json = await res.json();
        renderPets(json.pets || []);
      } catch (err) {
        renderPets([]);
        toast('Failed to load pets.', false);
      }
    }

    fileInput.addEventListener('change', () => {
      const file = fileInput.files[0];
      if (file) {
        preview.src = URL.createObjectURL(file);
        preview.style.display = 'block';
      } else {
        preview.style.display = 'none';
      }
    });

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const file = fileInput.files[0];
      if (!file) {
        toast('Please select an image for the pet', false);
        return;
      }
      const name = document.getElementById('name').value;
      const age = document.getElementById('age').value;
      const breed = document.getElementById('breed').value;
      if (!name.trim() || !age.trim() || !breed.trim()) {
        toast('Name, age and breed are required', false);
        return;
      }

      const formData = new FormData();
      formData.append('file', file);
      formData.append('name', name);
      formData.append('age', age);
      formData.append('breed', breed);
      formData.append('description', document.getElementById('description').value);

      submitBtn.disabled = true;
      submitBtn.textContent = 'Adding Pet...';
      try {
        const res = await fetch('/api/pets', { method: 'POST', body: formData });
        if (!res.ok) throw new Error('Failed to add pet');
        toast(`${name} has been added to the pet listing`, true);
        form.reset();
        preview.style.display = 'none';
        window.location.reload();
      } catch (err) {
        toast('Failed to add pet. Please try again.', false);
      } finally {
        submitBtn.disabled = false;
        submitBtn.textContent = 'Add Pet';
      }
    });

    loadPets();
  </script>
</body>
</html>"#)
}
